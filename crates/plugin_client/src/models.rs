//! Request and response bodies of the plugin REST endpoints that are not part
//! of the core domain model.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Field an endpoint uses for its structured error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorField {
    /// `{"error": "..."}`
    Error,
    /// `{"message": "..."}`
    Message,
}

impl ErrorField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Message => "message",
        }
    }

    /// The other structured field, tried when this one is absent.
    pub fn fallback(&self) -> Self {
        match self {
            Self::Error => Self::Message,
            Self::Message => Self::Error,
        }
    }
}

/// The plugin REST endpoints consumed by the controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    FetchConfig,
    SaveConfig,
    TestConnection,
    GenerateSecret,
    RegisterWebhooks,
    IssueInfo,
    CreateBranch,
    CreatePullRequest,
    Health,
}

impl Endpoint {
    /// Structured error field this endpoint reports failures in.
    ///
    /// The connection test reports in `message`; every other endpoint uses
    /// `error`.
    pub fn error_field(&self) -> ErrorField {
        match self {
            Self::TestConnection => ErrorField::Message,
            _ => ErrorField::Error,
        }
    }

    /// Method and path template, for logs and error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::FetchConfig => "GET /config",
            Self::SaveConfig => "PUT /config",
            Self::TestConnection => "POST /config/test-connection",
            Self::GenerateSecret => "POST /config/generate-secret",
            Self::RegisterWebhooks => "POST /config/register-webhooks",
            Self::IssueInfo => "GET /issue/{issueKey}/github-info",
            Self::CreateBranch => "POST /branch/create",
            Self::CreatePullRequest => "POST /pr/create",
            Self::Health => "GET /health",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Response of `POST /config/test-connection`.
///
/// The backend answers HTTP 200 for a failed connection test and reports the failure in
/// `success` / `message`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionTestResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `POST /config/generate-secret`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedSecret {
    #[serde(default)]
    pub secret: Option<String>,
}

/// Body of `POST /branch/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchRequest {
    pub issue_key: String,
    pub base_branch: String,
    pub branch_name: String,
}

/// Response of `POST /branch/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreatedBranch {
    /// Full ref, e.g. `refs/heads/feature/PROJ-1-x`.
    #[serde(rename = "ref", default)]
    pub git_ref: Option<String>,

    #[serde(default)]
    pub sha: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Body of `POST /pr/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequestRequest {
    pub issue_key: String,
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub description: String,
}

/// Response of `POST /pr/create`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedPullRequest {
    pub number: u64,

    #[serde(default)]
    pub title: Option<String>,

    /// Browser link to the pull request.
    pub url: String,

    #[serde(default)]
    pub state: Option<String>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,

    #[serde(default)]
    pub version: Option<String>,
}
