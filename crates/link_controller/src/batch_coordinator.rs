//! Bulk webhook registration across every mapped repository.
//!
//! The backend fans one request out to all mappings and answers with
//! aggregate counts plus per-repository details. This module classifies that
//! answer and decides whether the page reloads.

use std::sync::Arc;
use std::time::Duration;

use link_core::{BatchResult, BatchStatus, OperationResult, Status};
use plugin_client::PluginApi;
use tracing::{debug, instrument, warn};

use crate::host::{Control, Notification, StatusRegion};
use crate::orchestrator::{Action, Presentation, RequestOrchestrator};

#[cfg(test)]
#[path = "batch_coordinator_tests.rs"]
mod tests;

/// Delay between a completed save or registration and the page reload.
pub const RELOAD_DELAY: Duration = Duration::from_secs(2);

const REGISTER: Action = Action {
    control: Control::RegisterWebhooks,
    region: Some(StatusRegion::RegisterWebhooks),
    working: "Registering webhooks...",
    failure_title: "Registration Failed",
    fallback: "Failed to register webhooks",
};

/// Registers webhooks for all mapped repositories in one orchestrated call.
pub struct BatchRegistrationCoordinator {
    api: Arc<dyn PluginApi>,
    orchestrator: Arc<RequestOrchestrator>,
}

impl BatchRegistrationCoordinator {
    pub fn new(api: Arc<dyn PluginApi>, orchestrator: Arc<RequestOrchestrator>) -> Self {
        Self { api, orchestrator }
    }

    /// Registers webhooks and presents the aggregate outcome.
    ///
    /// Only a [`BatchStatus::Complete`] outcome reloads the page, after
    /// [`RELOAD_DELAY`]. Partial, failed and empty batches are shown as a
    /// warning and leave the page as is.
    #[instrument(skip(self))]
    pub async fn register_all(&self) -> OperationResult<BatchResult> {
        let outcome = self
            .orchestrator
            .execute(&REGISTER, self.api.register_webhooks(), presentation)
            .await;

        if let OperationResult::Success(batch) = &outcome {
            log_targets(batch);
            if batch.status().is_complete() {
                tokio::time::sleep(RELOAD_DELAY).await;
                self.orchestrator.host().reload_page();
            }
        }

        outcome
    }
}

/// What a finished batch looks like to the admin.
pub fn presentation(batch: &BatchResult) -> Presentation {
    match batch.status() {
        BatchStatus::Complete => Presentation::new(
            Status::Success(format!(
                "{} webhook(s) registered successfully",
                batch.success_count
            )),
            Notification::success("Webhooks Registered", batch.summary()),
        ),
        BatchStatus::Partial | BatchStatus::Failed | BatchStatus::Empty => {
            let summary = batch.summary();
            Presentation::new(
                Status::Warning(summary.clone()),
                Notification::warning("Partial Success", summary),
            )
        }
    }
}

fn log_targets(batch: &BatchResult) {
    for target in &batch.per_target_results {
        debug!(
            repository = %target.target,
            success = target.ok,
            detail = target.detail.as_str(),
            "Webhook registration result"
        );
    }

    for target in batch.failed_targets() {
        warn!(
            repository = %target.target,
            detail = target.detail.as_str(),
            "Webhook registration failed"
        );
    }
}
