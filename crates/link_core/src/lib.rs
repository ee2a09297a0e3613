//! Domain model and pure state transitions for the issue to repository link
//! integration.
//!
//! Nothing in this crate performs I/O. It holds the admin form state, checks it
//! before requests are made, classifies batch outcomes and derives what the
//! issue panel shows. The REST client lives in `plugin_client` and the
//! request workflows in `link_controller`.

pub mod batch;
pub mod branch_name;
pub mod configuration;
pub mod errors;
pub mod issue;
pub mod mappings;
pub mod operation;
pub mod panel;
pub mod validation;

pub use batch::{BatchResult, BatchStatus, TargetResult};
pub use branch_name::{sanitize, suggest_branch_name};
pub use configuration::{
    derive_api_url, ConfigForm, Configuration, ConnectionTest, RemoteConfiguration,
    TransitionEvent, TransitionMap, WriteOnlyField,
};
pub use errors::ValidationError;
pub use issue::{IssueGithubInfo, IssueKey, LinkedBranch, LinkedPullRequest};
pub use mappings::{Mapping, MappingCollection, MappingRow, RowId};
pub use operation::{OperationResult, Status};
pub use panel::PanelView;
pub use validation::{
    validate_branch_form, validate_config, validate_connection_test, validate_pull_request_form,
    ValidationResult,
};
