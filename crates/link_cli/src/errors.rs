use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the issue-link CLI application.
///
/// Failures of orchestrated actions have already been shown to the user by
/// the terminal host when they surface here; the variant only carries the
/// message for the exit status.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or saving the settings file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An admin draft file could not be read or contains unknown keys.
    #[error("Draft error: {0}")]
    Draft(String),

    /// Input was rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] link_core::ValidationError),

    /// The plugin backend could not be reached or refused a request made
    /// outside an orchestrated action.
    #[error(transparent)]
    Client(#[from] plugin_client::Error),

    /// An orchestrated action failed.
    #[error("{0}")]
    ActionFailed(String),

    /// Writing to the terminal failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
