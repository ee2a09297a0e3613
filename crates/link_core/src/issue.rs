//! Issue keys and the branch / pull request snapshot linked to an issue.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::configuration::{string_or_null, vec_or_null};
use crate::errors::ValidationError;

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;

static ISSUE_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Z0-9]+-[0-9]+$").expect("issue key pattern is a valid regex")
});

/// A validated issue key such as `PROJ-123`.
///
/// Keys are trimmed and upper-cased before validation.
///
/// # Examples
///
/// ```rust
/// use link_core::IssueKey;
///
/// let key = IssueKey::parse(" proj-42 ").unwrap();
/// assert_eq!(key.as_str(), "PROJ-42");
///
/// assert!(IssueKey::parse("42").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IssueKey(String);

impl IssueKey {
    /// Normalises and validates an issue key.
    ///
    /// # Errors
    ///
    /// - `ValidationError::IssueKeyRequired` for blank input
    /// - `ValidationError::InvalidIssueKey` when the key is not `PROJECT-123`
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let normalised = value.trim().to_uppercase();
        if normalised.is_empty() {
            return Err(ValidationError::IssueKeyRequired);
        }

        if !ISSUE_KEY_PATTERN.is_match(&normalised) {
            return Err(ValidationError::InvalidIssueKey(value.to_string()));
        }

        Ok(Self(normalised))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The project part of the key (`PROJ` for `PROJ-123`).
    pub fn project_key(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for IssueKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A branch linked to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedBranch {
    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,

    #[serde(default, deserialize_with = "string_or_null")]
    pub url: String,
}

/// A pull request linked to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedPullRequest {
    pub number: u64,

    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,

    #[serde(default, deserialize_with = "string_or_null")]
    pub url: String,

    /// Hosting-side state, e.g. `open`, `closed`, `merged`.
    #[serde(default, deserialize_with = "string_or_null")]
    pub state: String,
}

/// Snapshot of everything linked to one issue, from
/// `GET /issue/{issueKey}/github-info`.
///
/// A snapshot replaces the previous one entirely; it is never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueGithubInfo {
    #[serde(rename = "issueKey", default, skip_serializing_if = "Option::is_none")]
    pub issue_key: Option<String>,

    #[serde(default, deserialize_with = "vec_or_null")]
    pub branches: Vec<LinkedBranch>,

    #[serde(rename = "pullRequests", default, deserialize_with = "vec_or_null")]
    pub pull_requests: Vec<LinkedPullRequest>,
}

impl IssueGithubInfo {
    /// True when nothing is linked yet.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.pull_requests.is_empty()
    }
}
