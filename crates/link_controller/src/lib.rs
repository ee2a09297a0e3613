//! Workflow controllers of the issue to repository link integration.
//!
//! Each controller validates its form with `link_core`, runs the request
//! through a [`RequestOrchestrator`] against a [`plugin_client::PluginApi`],
//! and renders the outcome through a [`Host`]. Controllers are constructed
//! with everything they need; there is no global state.

pub mod admin;
pub mod batch_coordinator;
pub mod branch_flow;
pub mod host;
pub mod issue_panel;
pub mod orchestrator;
pub mod panel_loader;
pub mod pr_flow;

#[cfg(test)]
pub(crate) mod test_support;

pub use admin::AdminController;
pub use batch_coordinator::{BatchRegistrationCoordinator, RELOAD_DELAY};
pub use branch_flow::{BranchCreationFlow, BranchForm};
pub use host::{Control, Dialog, Host, Notification, NotificationLevel, StatusRegion};
pub use issue_panel::IssuePanel;
pub use orchestrator::{Action, Presentation, RequestOrchestrator};
pub use panel_loader::{IssueContext, PanelLoader};
pub use pr_flow::{PullRequestCreationFlow, PullRequestForm};

/// Phase of a creation dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlowPhase {
    #[default]
    Closed,
    Open,
    /// The request is running; further submits are ignored.
    Submitting,
}
