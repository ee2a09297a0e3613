//! The "create branch" dialog of the issue panel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use link_core::mappings::DEFAULT_BRANCH;
use link_core::{suggest_branch_name, validate_branch_form, OperationResult, Status};
use plugin_client::{CreateBranchRequest, CreatedBranch, PluginApi};
use tracing::{info, instrument, warn};

use crate::host::{Control, Dialog, Notification, StatusRegion};
use crate::orchestrator::{Action, Presentation, RequestOrchestrator};
use crate::panel_loader::PanelLoader;
use crate::FlowPhase;

#[cfg(test)]
#[path = "branch_flow_tests.rs"]
mod tests;

const CREATE_BRANCH: Action = Action {
    control: Control::CreateBranch,
    region: Some(StatusRegion::BranchDialog),
    working: "Creating branch...",
    failure_title: "Error",
    fallback: "Failed to create branch",
};

pub(crate) const DIALOG_CLOSED: &str = "The dialog is not open";

/// Values typed into the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchForm {
    pub branch_name: String,

    /// Branch to fork from. Blank means [`DEFAULT_BRANCH`].
    pub base_branch: String,
}

impl Default for BranchForm {
    fn default() -> Self {
        Self {
            branch_name: String::new(),
            base_branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct BranchState {
    phase: FlowPhase,
    form: BranchForm,
}

/// State machine of the "create branch" dialog:
/// `Closed -> Open -> Submitting -> Closed | Open`.
pub struct BranchCreationFlow {
    api: Arc<dyn PluginApi>,
    orchestrator: Arc<RequestOrchestrator>,
    panel: Arc<PanelLoader>,
    state: Mutex<BranchState>,
}

impl BranchCreationFlow {
    pub fn new(
        api: Arc<dyn PluginApi>,
        orchestrator: Arc<RequestOrchestrator>,
        panel: Arc<PanelLoader>,
    ) -> Self {
        Self {
            api,
            orchestrator,
            panel,
            state: Mutex::new(BranchState::default()),
        }
    }

    pub fn phase(&self) -> FlowPhase {
        self.lock().phase
    }

    pub fn form(&self) -> BranchForm {
        self.lock().form.clone()
    }

    /// Edits the typed values.
    pub fn edit(&self, f: impl FnOnce(&mut BranchForm)) {
        f(&mut self.lock().form);
    }

    pub fn open(&self) {
        let mut state = self.lock();
        if state.phase == FlowPhase::Closed {
            state.phase = FlowPhase::Open;
            drop(state);
            self.orchestrator.host().show_dialog(Dialog::CreateBranch);
        }
    }

    /// Fills the branch name from the issue key and summary.
    pub fn autofill(&self) {
        let context = self.panel.context();
        let suggestion = suggest_branch_name(context.issue_key(), context.summary());
        self.lock().form.branch_name = suggestion;
    }

    /// Closes the dialog and clears the form.
    pub fn cancel(&self) {
        {
            let mut state = self.lock();
            if state.phase == FlowPhase::Submitting {
                return;
            }
            *state = BranchState::default();
        }
        let host = self.orchestrator.host();
        host.hide_dialog(Dialog::CreateBranch);
        host.set_status(StatusRegion::BranchDialog, &Status::Idle);
    }

    /// Creates the branch.
    ///
    /// A blank branch name is rejected inline and no request is made. On
    /// success the dialog closes, the form clears and the panel reloads. On
    /// failure the dialog stays open with the typed values intact.
    #[instrument(skip(self), fields(issue_key = %self.panel.context().issue_key()))]
    pub async fn submit(&self) -> OperationResult<CreatedBranch> {
        let request = {
            let mut state = self.lock();
            match state.phase {
                FlowPhase::Submitting => return OperationResult::InFlight,
                FlowPhase::Closed => {
                    warn!("Create branch submitted while the dialog is closed");
                    return OperationResult::Failure(DIALOG_CLOSED.to_string());
                }
                FlowPhase::Open => {}
            }

            if let Err(error) = validate_branch_form(&state.form.branch_name) {
                drop(state);
                return self.orchestrator.reject(StatusRegion::BranchDialog, &error);
            }

            state.phase = FlowPhase::Submitting;
            self.request(&state.form)
        };
        let _submitting = SubmitGuard { flow: self };

        let branch_name = request.branch_name.clone();
        let outcome = self
            .orchestrator
            .execute(&CREATE_BRANCH, self.api.create_branch(&request), |_| {
                Presentation::new(
                    Status::Idle,
                    Notification::success(
                        "Branch Created",
                        format!("Branch {branch_name} created successfully!"),
                    ),
                )
            })
            .await;

        if outcome.is_success() {
            info!(branch = %request.branch_name, "Branch created");
            *self.lock() = BranchState::default();
            self.orchestrator.host().hide_dialog(Dialog::CreateBranch);
            self.panel.load().await;
        }

        outcome
    }

    fn request(&self, form: &BranchForm) -> CreateBranchRequest {
        let base_branch = match form.base_branch.trim() {
            "" => DEFAULT_BRANCH,
            typed => typed,
        };

        CreateBranchRequest {
            issue_key: self.panel.context().issue_key().to_string(),
            base_branch: base_branch.to_string(),
            branch_name: form.branch_name.trim().to_string(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BranchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Puts a submit that ends without closing the dialog back to `Open`,
/// including when the submit future is dropped mid-request.
struct SubmitGuard<'a> {
    flow: &'a BranchCreationFlow,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.flow.lock();
        if state.phase == FlowPhase::Submitting {
            state.phase = FlowPhase::Open;
        }
    }
}
