//! Candidate branch names derived from an issue summary.

use std::sync::LazyLock;

use regex::Regex;

use crate::issue::IssueKey;

#[cfg(test)]
#[path = "branch_name_tests.rs"]
mod tests;

/// Longest sanitized summary fragment kept in a branch name.
pub const MAX_SANITIZED_LENGTH: usize = 50;

/// Prefix of every suggested branch name.
pub const BRANCH_PREFIX: &str = "feature/";

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("disallowed pattern is a valid regex"));

static DASH_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("dash pattern is a valid regex"));

/// Turns free text into a branch-name fragment.
///
/// The text is lower-cased, every character outside `[a-z0-9-]` becomes `-`,
/// runs of `-` collapse to one, and leading/trailing `-` are trimmed. The
/// result is cut to [`MAX_SANITIZED_LENGTH`] characters and trimmed again so
/// it never starts or ends with `-`.
///
/// # Examples
///
/// ```rust
/// use link_core::sanitize;
///
/// assert_eq!(sanitize("Fix Login Bug!!"), "fix-login-bug");
/// ```
pub fn sanitize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let replaced = DISALLOWED.replace_all(&lowered, "-");
    let collapsed = DASH_RUNS.replace_all(&replaced, "-");
    let trimmed = collapsed.trim_matches('-');

    // Only ASCII remains at this point, so byte and char lengths agree.
    let truncated = &trimmed[..trimmed.len().min(MAX_SANITIZED_LENGTH)];
    truncated.trim_end_matches('-').to_string()
}

/// Suggests `feature/<issueKey>-<sanitized summary>`.
///
/// When the summary sanitizes to nothing the trailing separator is dropped.
pub fn suggest_branch_name(issue_key: &IssueKey, summary: &str) -> String {
    let fragment = sanitize(summary);
    if fragment.is_empty() {
        return format!("{}{}", BRANCH_PREFIX, issue_key);
    }

    format!("{}{}-{}", BRANCH_PREFIX, issue_key, fragment)
}
