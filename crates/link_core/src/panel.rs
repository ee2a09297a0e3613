//! What the issue panel shows for the current snapshot.

use crate::issue::{IssueGithubInfo, LinkedBranch, LinkedPullRequest};

#[cfg(test)]
#[path = "panel_tests.rs"]
mod tests;

/// Message shown when loading the snapshot failed.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load GitHub information";

/// Rendered state of the issue panel.
///
/// Each load replaces the whole view. A failed load yields
/// [`PanelView::Error`], never the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelView {
    /// Nothing loaded yet.
    #[default]
    Loading,

    /// Loaded, and nothing is linked to the issue.
    NoActivity,

    /// Loaded with at least one branch or pull request.
    Activity {
        branches: Vec<LinkedBranch>,
        pull_requests: Vec<LinkedPullRequest>,
    },

    /// Loading failed.
    Error(String),
}

impl From<IssueGithubInfo> for PanelView {
    fn from(info: IssueGithubInfo) -> Self {
        if info.is_empty() {
            return Self::NoActivity;
        }

        Self::Activity {
            branches: info.branches,
            pull_requests: info.pull_requests,
        }
    }
}
