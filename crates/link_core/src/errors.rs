//! Error types for form and input validation.
//!
//! Validation errors are raised locally before any request is issued. Their
//! `Display` text is the exact inline message shown next to the offending
//! form, so callers can render `error.to_string()` directly.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Reasons a form or input was rejected before reaching the network layer.
///
/// Validation errors are never sent as notifications. They are rendered inline
/// and leave the form interactive so the user can correct the value and retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The admin form has no GitHub Enterprise URL.
    #[error("GitHub Enterprise URL is required")]
    EnterpriseUrlRequired,

    /// No complete project to repository mapping remains after incomplete
    /// rows were dropped.
    #[error("At least one repository mapping is required")]
    MappingRequired,

    /// A connection test was requested without a GitHub Enterprise URL.
    #[error("Enter GitHub Enterprise URL first")]
    ConnectionUrlRequired,

    /// The branch creation dialog was submitted without a branch name.
    #[error("Branch name is required")]
    BranchNameRequired,

    /// The pull request dialog was submitted without a source branch.
    #[error("Source branch is required")]
    SourceBranchRequired,

    /// The pull request dialog was submitted without a title.
    #[error("Title is required")]
    TitleRequired,

    /// An issue key was empty.
    #[error("Issue key is required")]
    IssueKeyRequired,

    /// An issue key did not match the `PROJECT-123` shape.
    ///
    /// The contained string is the rejected input.
    #[error("Invalid issue key format. Expected format: PROJECT-123")]
    InvalidIssueKey(String),

    /// The REST base URL for the plugin was empty.
    #[error("REST URL is required")]
    RestUrlRequired,
}
