//! Aggregate result of bulk webhook registration and its classification.
//!
//! The backend fans a single "register webhooks" request out to every
//! configured mapping and answers with counts plus one entry per repository.

use serde::{Deserialize, Serialize};

use crate::configuration::vec_or_null;

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;

/// Outcome of registering the webhook on one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResult {
    /// Repository in `owner/repo` form.
    #[serde(rename = "repository", default)]
    pub target: String,

    /// Whether registration succeeded for this repository.
    #[serde(rename = "success", default)]
    pub ok: bool,

    /// Backend detail, e.g. "Webhook registered: 42" or "Failed: ...".
    #[serde(rename = "message", default)]
    pub detail: String,
}

/// Response of `POST /config/register-webhooks`.
///
/// Missing counts decode as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(rename = "successCount", default)]
    pub success_count: u64,

    #[serde(rename = "totalCount", default)]
    pub total_count: u64,

    #[serde(rename = "results", default, deserialize_with = "vec_or_null")]
    pub per_target_results: Vec<TargetResult>,
}

/// Classification of a [`BatchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every target succeeded and there was at least one.
    Complete,

    /// Some but not all targets succeeded. Inconsistent counts (more
    /// successes than targets) also land here.
    Partial,

    /// Targets existed but none succeeded.
    Failed,

    /// There were no targets at all.
    Empty,
}

impl BatchStatus {
    /// Only a complete batch is presented as success and triggers a reload.
    /// Every other status is presented as a warning.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl BatchResult {
    /// Classifies the counts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use link_core::{BatchResult, BatchStatus};
    ///
    /// let result = BatchResult { success_count: 0, total_count: 0, ..Default::default() };
    /// assert_eq!(result.status(), BatchStatus::Empty);
    /// assert!(!result.status().is_complete());
    /// ```
    pub fn status(&self) -> BatchStatus {
        if self.total_count == 0 {
            return BatchStatus::Empty;
        }

        if self.success_count == self.total_count {
            BatchStatus::Complete
        } else if self.success_count == 0 {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial
        }
    }

    /// Human-readable summary for the notification body and status text.
    pub fn summary(&self) -> String {
        match self.status() {
            BatchStatus::Complete => format!(
                "Successfully registered {} webhook(s)",
                self.success_count
            ),
            _ => format!(
                "Registered {} of {} webhooks",
                self.success_count, self.total_count
            ),
        }
    }

    /// Targets whose registration failed.
    pub fn failed_targets(&self) -> impl Iterator<Item = &TargetResult> {
        self.per_target_results.iter().filter(|result| !result.ok)
    }
}
