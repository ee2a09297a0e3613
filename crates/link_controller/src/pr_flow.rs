//! The "create pull request" dialog of the issue panel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use link_core::mappings::DEFAULT_BRANCH;
use link_core::{validate_pull_request_form, OperationResult, Status};
use plugin_client::{CreatePullRequestRequest, CreatedPullRequest, PluginApi};
use tracing::{info, instrument, warn};

use crate::branch_flow::DIALOG_CLOSED;
use crate::host::{Control, Dialog, Notification, StatusRegion};
use crate::orchestrator::{Action, Presentation, RequestOrchestrator};
use crate::panel_loader::PanelLoader;
use crate::FlowPhase;

#[cfg(test)]
#[path = "pr_flow_tests.rs"]
mod tests;

const CREATE_PULL_REQUEST: Action = Action {
    control: Control::CreatePullRequest,
    region: Some(StatusRegion::PullRequestDialog),
    working: "Creating pull request...",
    failure_title: "Error",
    fallback: "Failed to create pull request",
};

/// Values typed into the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestForm {
    pub source_branch: String,

    /// Branch to merge into. Blank means [`DEFAULT_BRANCH`].
    pub target_branch: String,

    pub title: String,
    pub description: String,
}

impl Default for PullRequestForm {
    fn default() -> Self {
        Self {
            source_branch: String::new(),
            target_branch: DEFAULT_BRANCH.to_string(),
            title: String::new(),
            description: String::new(),
        }
    }
}

impl PullRequestForm {
    /// Clears everything except the title.
    fn clear(&mut self) {
        self.source_branch.clear();
        self.target_branch = DEFAULT_BRANCH.to_string();
        self.description.clear();
    }
}

#[derive(Debug, Default)]
struct PullRequestState {
    phase: FlowPhase,
    form: PullRequestForm,
}

/// State machine of the "create pull request" dialog, shaped like
/// [`crate::BranchCreationFlow`].
pub struct PullRequestCreationFlow {
    api: Arc<dyn PluginApi>,
    orchestrator: Arc<RequestOrchestrator>,
    panel: Arc<PanelLoader>,
    state: Mutex<PullRequestState>,
}

impl PullRequestCreationFlow {
    pub fn new(
        api: Arc<dyn PluginApi>,
        orchestrator: Arc<RequestOrchestrator>,
        panel: Arc<PanelLoader>,
    ) -> Self {
        Self {
            api,
            orchestrator,
            panel,
            state: Mutex::new(PullRequestState::default()),
        }
    }

    pub fn phase(&self) -> FlowPhase {
        self.lock().phase
    }

    pub fn form(&self) -> PullRequestForm {
        self.lock().form.clone()
    }

    pub fn edit(&self, f: impl FnOnce(&mut PullRequestForm)) {
        f(&mut self.lock().form);
    }

    pub fn open(&self) {
        let mut state = self.lock();
        if state.phase == FlowPhase::Closed {
            state.phase = FlowPhase::Open;
            drop(state);
            self.orchestrator
                .host()
                .show_dialog(Dialog::CreatePullRequest);
        }
    }

    /// Closes the dialog and clears the form. The title is kept.
    pub fn cancel(&self) {
        {
            let mut state = self.lock();
            if state.phase == FlowPhase::Submitting {
                return;
            }
            state.phase = FlowPhase::Closed;
            state.form.clear();
        }
        let host = self.orchestrator.host();
        host.hide_dialog(Dialog::CreatePullRequest);
        host.set_status(StatusRegion::PullRequestDialog, &Status::Idle);
    }

    /// Opens the pull request.
    ///
    /// Source branch and title are required, checked in that order. The
    /// confirmation names the new pull request number and links to it.
    #[instrument(skip(self), fields(issue_key = %self.panel.context().issue_key()))]
    pub async fn submit(&self) -> OperationResult<CreatedPullRequest> {
        let request = {
            let mut state = self.lock();
            match state.phase {
                FlowPhase::Submitting => return OperationResult::InFlight,
                FlowPhase::Closed => {
                    warn!("Create pull request submitted while the dialog is closed");
                    return OperationResult::Failure(DIALOG_CLOSED.to_string());
                }
                FlowPhase::Open => {}
            }

            let form = &state.form;
            if let Err(error) = validate_pull_request_form(&form.source_branch, &form.title) {
                drop(state);
                return self
                    .orchestrator
                    .reject(StatusRegion::PullRequestDialog, &error);
            }

            let request = self.request(&state.form);
            state.phase = FlowPhase::Submitting;
            request
        };
        let _submitting = SubmitGuard { flow: self };

        let outcome = self
            .orchestrator
            .execute(
                &CREATE_PULL_REQUEST,
                self.api.create_pull_request(&request),
                |created| {
                    Presentation::new(
                        Status::Idle,
                        Notification::success(
                            "Pull Request Created",
                            format!("PR #{} created successfully!", created.number),
                        )
                        .with_link(created.url.clone()),
                    )
                },
            )
            .await;

        if let OperationResult::Success(created) = &outcome {
            info!(number = created.number, url = %created.url, "Pull request created");
            {
                let mut state = self.lock();
                state.phase = FlowPhase::Closed;
                state.form.clear();
            }
            self.orchestrator
                .host()
                .hide_dialog(Dialog::CreatePullRequest);
            self.panel.load().await;
        }

        outcome
    }

    fn request(&self, form: &PullRequestForm) -> CreatePullRequestRequest {
        let target_branch = match form.target_branch.trim() {
            "" => DEFAULT_BRANCH,
            typed => typed,
        };

        CreatePullRequestRequest {
            issue_key: self.panel.context().issue_key().to_string(),
            source_branch: form.source_branch.trim().to_string(),
            target_branch: target_branch.to_string(),
            title: form.title.trim().to_string(),
            description: form.description.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PullRequestState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Puts a submit that ends without closing the dialog back to `Open`,
/// including when the submit future is dropped mid-request.
struct SubmitGuard<'a> {
    flow: &'a PullRequestCreationFlow,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.flow.lock();
        if state.phase == FlowPhase::Submitting {
            state.phase = FlowPhase::Open;
        }
    }
}
