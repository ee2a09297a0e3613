//! The issue panel: linked activity plus the two creation dialogs.

use std::sync::Arc;

use link_core::PanelView;
use plugin_client::PluginApi;

use crate::branch_flow::BranchCreationFlow;
use crate::host::Host;
use crate::orchestrator::RequestOrchestrator;
use crate::panel_loader::{IssueContext, PanelLoader};
use crate::pr_flow::PullRequestCreationFlow;

#[cfg(test)]
#[path = "issue_panel_tests.rs"]
mod tests;

/// Everything shown for one issue, wired to a single host.
pub struct IssuePanel {
    loader: Arc<PanelLoader>,
    branch: BranchCreationFlow,
    pull_request: PullRequestCreationFlow,
}

impl IssuePanel {
    pub fn new(api: Arc<dyn PluginApi>, host: Arc<dyn Host>, context: IssueContext) -> Self {
        let orchestrator = Arc::new(RequestOrchestrator::new(host.clone()));
        let loader = Arc::new(PanelLoader::new(api.clone(), host, Arc::new(context)));
        let branch = BranchCreationFlow::new(api.clone(), orchestrator.clone(), loader.clone());
        let pull_request = PullRequestCreationFlow::new(api, orchestrator, loader.clone());

        Self {
            loader,
            branch,
            pull_request,
        }
    }

    /// Loads the linked activity for the first time.
    pub async fn mount(&self) -> PanelView {
        self.loader.load().await
    }

    pub fn loader(&self) -> &PanelLoader {
        &self.loader
    }

    pub fn branch(&self) -> &BranchCreationFlow {
        &self.branch
    }

    pub fn pull_request(&self) -> &PullRequestCreationFlow {
        &self.pull_request
    }
}
