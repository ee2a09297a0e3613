//! Validation of form state before any request is issued.
//!
//! Every function here is pure: no network, no rendering. Rules are checked in
//! order and the first failing rule wins.

use crate::configuration::{Configuration, ConnectionTest};
use crate::errors::ValidationError;

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;

/// Outcome of a validation check: `Ok(())` when valid, otherwise the first
/// failing rule.
pub type ValidationResult = Result<(), ValidationError>;

/// Checks that a configuration may be saved.
///
/// # Rules
///
/// 1. `enterprise_url` must be non-empty.
/// 2. At least one mapping must remain. The payload built by
///    [`crate::ConfigForm::to_configuration`] already has incomplete rows
///    removed, so a form whose rows are all partial fails here.
///
/// # Examples
///
/// ```rust
/// use link_core::{validate_config, ConfigForm, ValidationError};
///
/// let form = ConfigForm::default();
/// assert_eq!(
///     validate_config(&form.to_configuration()),
///     Err(ValidationError::EnterpriseUrlRequired)
/// );
/// ```
pub fn validate_config(config: &Configuration) -> ValidationResult {
    if config.enterprise_url.trim().is_empty() {
        return Err(ValidationError::EnterpriseUrlRequired);
    }

    if config.mappings.is_empty() {
        return Err(ValidationError::MappingRequired);
    }

    Ok(())
}

/// Checks that a connection test has something to connect to.
pub fn validate_connection_test(test: &ConnectionTest) -> ValidationResult {
    if test.enterprise_url.trim().is_empty() {
        return Err(ValidationError::ConnectionUrlRequired);
    }

    Ok(())
}

/// Checks the branch creation dialog. The base branch is optional.
pub fn validate_branch_form(branch_name: &str) -> ValidationResult {
    if branch_name.trim().is_empty() {
        return Err(ValidationError::BranchNameRequired);
    }

    Ok(())
}

/// Checks the pull request dialog: source branch first, then title.
pub fn validate_pull_request_form(source_branch: &str, title: &str) -> ValidationResult {
    if source_branch.trim().is_empty() {
        return Err(ValidationError::SourceBranchRequired);
    }

    if title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    Ok(())
}
