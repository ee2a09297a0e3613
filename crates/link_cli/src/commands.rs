//! Command modules for the issue-link CLI.
//!
//! Each submodule handles a specific command category:
//!
//! - `admin_cmd`: Integration configuration and webhook registration
//! - `config_cmd`: Settings file management
//! - `health_cmd`: Plugin backend health check
//! - `issue_cmd`: Issue panel, branch and pull request creation

use std::sync::Arc;

use link_core::OperationResult;
use plugin_client::{PluginApi, PluginClient};

use crate::config::Settings;
use crate::errors::Error;

pub mod admin_cmd;
pub mod config_cmd;
pub mod health_cmd;
pub mod issue_cmd;

/// Builds the REST client from the settings.
pub(crate) fn connect(settings: &Settings) -> Result<Arc<dyn PluginApi>, Error> {
    let client = PluginClient::new(settings.rest_url()?)?;
    Ok(Arc::new(client))
}

/// Turns the outcome of an orchestrated action into the command result.
///
/// The host has already printed the failure; only the exit status is left.
pub(crate) fn finish<T>(outcome: OperationResult<T>) -> Result<T, Error> {
    match outcome {
        OperationResult::Success(value) => Ok(value),
        OperationResult::Failure(message) => Err(Error::ActionFailed(message)),
        OperationResult::InFlight => Err(Error::ActionFailed(
            "The action is already in progress".to_string(),
        )),
    }
}
