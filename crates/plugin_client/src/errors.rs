//! Error types for plugin REST client operations.
//!
//! Besides the error enum this module implements the message extraction used
//! for every failed request: the endpoint's structured error field first,
//! then a list of validation errors, then the raw response body, and finally
//! a caller-supplied generic message.

use serde_json::Value;

use crate::models::{Endpoint, ErrorField};

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur when calling the plugin REST endpoints.
///
/// ## Examples
///
/// ```rust
/// use plugin_client::{Endpoint, Error};
///
/// let error = Error::Api {
///     endpoint: Endpoint::SaveConfig,
///     status: 400,
///     message: Some("GitHub token is required".to_string()),
/// };
/// assert_eq!(error.user_message("Failed to save configuration"), "GitHub token is required");
///
/// let error = Error::Transport {
///     endpoint: Endpoint::SaveConfig,
///     reason: "connection refused".to_string(),
/// };
/// assert_eq!(error.user_message("Failed to save configuration"), "Failed to save configuration");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured REST base URL cannot be used.
    ///
    /// The URL must be absolute and use HTTP or HTTPS.
    #[error("Invalid plugin REST URL: {0}")]
    InvalidBaseUrl(String),

    /// The request did not complete: connection refused, TLS failure, reset
    /// connection and similar.
    ///
    /// There is no response body, so no specific message is available.
    #[error("Request to {endpoint} did not complete: {reason}")]
    Transport { endpoint: Endpoint, reason: String },

    /// The endpoint answered with a non-success status.
    ///
    /// `message` holds the most specific text found in the response body.
    #[error("{endpoint} failed with HTTP {status}")]
    Api {
        endpoint: Endpoint,
        status: u16,
        message: Option<String>,
    },

    /// The endpoint answered successfully but reported that the operation
    /// failed (for example a connection test with `success: false`).
    #[error("{endpoint} reported failure")]
    Rejected {
        endpoint: Endpoint,
        message: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("Failed to decode {endpoint} response: {source}")]
    Deserialization {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// The endpoint involved, if any.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::InvalidBaseUrl(_) => None,
            Self::Transport { endpoint, .. }
            | Self::Api { endpoint, .. }
            | Self::Rejected { endpoint, .. }
            | Self::Deserialization { endpoint, .. } => Some(*endpoint),
        }
    }

    /// The specific message reported by the backend, if one was found.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the backend message when available, otherwise
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Extracts the most specific error message from a failed response body.
///
/// # Order
///
/// 1. The endpoint's structured field (`error` or `message`) when it is a
///    non-empty string.
/// 2. The other of the two fields, under the same condition.
/// 3. An `errors` array of strings, joined with `"; "`.
/// 4. The raw body, trimmed, when non-empty.
///
/// Returns `None` for an empty body.
pub fn extract_error_message(body: &str, field: ErrorField) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for candidate in [field, field.fallback()] {
            if let Some(Value::String(text)) = map.get(candidate.as_str()) {
                if !text.trim().is_empty() {
                    return Some(text.trim().to_string());
                }
            }
        }

        if let Some(Value::Array(items)) = map.get("errors") {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
    }

    let raw = body.trim();
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
