//! Loads and renders the branches and pull requests linked to one issue.

use std::sync::{Arc, Mutex, PoisonError};

use link_core::panel::LOAD_FAILED_MESSAGE;
use link_core::{IssueKey, PanelView};
use plugin_client::PluginApi;
use tracing::{debug, instrument, warn};

use crate::host::Host;

#[cfg(test)]
#[path = "panel_loader_tests.rs"]
mod tests;

/// The issue a panel is shown for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueContext {
    issue_key: IssueKey,
    summary: String,
}

impl IssueContext {
    pub fn new(issue_key: IssueKey, summary: impl Into<String>) -> Self {
        Self {
            issue_key,
            summary: summary.into(),
        }
    }

    pub fn issue_key(&self) -> &IssueKey {
        &self.issue_key
    }

    /// The issue summary, used to suggest branch names.
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// Keeps the issue panel in sync with the backend snapshot.
pub struct PanelLoader {
    api: Arc<dyn PluginApi>,
    host: Arc<dyn Host>,
    context: Arc<IssueContext>,
    view: Mutex<PanelView>,
}

impl PanelLoader {
    pub fn new(api: Arc<dyn PluginApi>, host: Arc<dyn Host>, context: Arc<IssueContext>) -> Self {
        Self {
            api,
            host,
            context,
            view: Mutex::new(PanelView::Loading),
        }
    }

    pub fn context(&self) -> &IssueContext {
        &self.context
    }

    /// The view rendered last.
    pub fn view(&self) -> PanelView {
        self.view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetches the snapshot and replaces the rendered view.
    ///
    /// A failed fetch renders [`PanelView::Error`]; the previous view is
    /// never left in place.
    #[instrument(skip(self), fields(issue_key = %self.context.issue_key()))]
    pub async fn load(&self) -> PanelView {
        let view = match self.api.issue_info(self.context.issue_key()).await {
            Ok(info) => {
                debug!(
                    branches = info.branches.len(),
                    pull_requests = info.pull_requests.len(),
                    "Loaded linked activity"
                );
                PanelView::from(info)
            }
            Err(error) => {
                warn!(error = %error, "Failed to load linked activity");
                PanelView::Error(LOAD_FAILED_MESSAGE.to_string())
            }
        };

        self.host.render_panel(&view);
        *self.view.lock().unwrap_or_else(PoisonError::into_inner) = view.clone();
        view
    }
}
