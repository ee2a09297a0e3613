//! Busy-state handling and outcome presentation for one asynchronous call.
//!
//! Every user action that talks to the plugin backend goes through
//! [`RequestOrchestrator::execute`]. The orchestrator owns the per-control
//! busy flags of one page, so a control cannot issue a second request while
//! its first one is still running. Different controls run independently.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use link_core::{OperationResult, Status, ValidationError};
use tracing::{debug, info, warn};

use crate::host::{Control, Host, Notification, StatusRegion};

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;

/// Static description of an orchestrated action.
#[derive(Debug, Clone, Copy)]
pub struct Action {
    /// The control that triggers the action and is disabled while it runs.
    pub control: Control,

    /// Inline status region of the action, if it has one.
    pub region: Option<StatusRegion>,

    /// Status text while the request runs, e.g. "Saving configuration...".
    pub working: &'static str,

    /// Notification title on failure.
    pub failure_title: &'static str,

    /// Message used when the failure carries no specific text.
    pub fallback: &'static str,
}

/// What to show once a request succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub status: Status,
    pub notification: Option<Notification>,
}

impl Presentation {
    pub fn new(status: Status, notification: Notification) -> Self {
        Self {
            status,
            notification: Some(notification),
        }
    }

    /// Updates the status region only.
    pub fn silent(status: Status) -> Self {
        Self {
            status,
            notification: None,
        }
    }
}

/// Runs orchestrated actions against one host.
pub struct RequestOrchestrator {
    host: Arc<dyn Host>,
    busy: Mutex<HashSet<Control>>,
}

impl RequestOrchestrator {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            busy: Mutex::new(HashSet::new()),
        }
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// True while an action triggered by `control` is running.
    pub fn is_busy(&self, control: Control) -> bool {
        self.busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&control)
    }

    /// Runs `request` as the action described by `action`.
    ///
    /// In order: the control is disabled, the status region shows the working
    /// text, the request is awaited, the outcome is presented, and the
    /// control is enabled again. The last step runs on every exit path,
    /// including when the returned future is dropped early.
    ///
    /// If the control is already busy, `request` is dropped without being
    /// polled and [`OperationResult::InFlight`] is returned.
    ///
    /// On success `present` decides what to show. On failure the status
    /// region and an error notification carry the most specific message
    /// available, falling back to `action.fallback`.
    pub async fn execute<T, Fut, P>(
        &self,
        action: &Action,
        request: Fut,
        present: P,
    ) -> OperationResult<T>
    where
        Fut: Future<Output = Result<T, plugin_client::Error>>,
        P: FnOnce(&T) -> Presentation,
    {
        let Some(_guard) = self.acquire(action.control) else {
            debug!(control = ?action.control, "Action already in flight, ignoring");
            return OperationResult::InFlight;
        };

        if let Some(region) = action.region {
            self.host
                .set_status(region, &Status::Working(action.working.to_string()));
        }

        match request.await {
            Ok(value) => {
                let presentation = present(&value);
                if let Some(region) = action.region {
                    self.host.set_status(region, &presentation.status);
                }
                if let Some(notification) = presentation.notification {
                    self.host.notify(notification);
                }
                info!(control = ?action.control, "Action succeeded");
                OperationResult::Success(value)
            }
            Err(error) => {
                let message = error.user_message(action.fallback);
                warn!(control = ?action.control, error = %error, "Action failed");
                if let Some(region) = action.region {
                    self.host.set_status(region, &Status::Error(message.clone()));
                }
                self.host
                    .notify(Notification::error(action.failure_title, message.clone()));
                OperationResult::Failure(message)
            }
        }
    }

    /// Renders a local validation failure inline. No notification is shown
    /// and no request is made.
    pub fn reject<T>(&self, region: StatusRegion, error: &ValidationError) -> OperationResult<T> {
        debug!(region = ?region, error = %error, "Form rejected before request");
        let message = error.to_string();
        self.host.set_status(region, &Status::Error(message.clone()));
        OperationResult::Failure(message)
    }

    fn acquire(&self, control: Control) -> Option<BusyGuard<'_>> {
        let inserted = self
            .busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(control);
        if !inserted {
            return None;
        }

        self.host.set_control_enabled(control, false);
        Some(BusyGuard {
            orchestrator: self,
            control,
        })
    }

    fn release(&self, control: Control) {
        self.busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&control);
        self.host.set_control_enabled(control, true);
    }
}

/// Marks a control busy for as long as it lives.
struct BusyGuard<'a> {
    orchestrator: &'a RequestOrchestrator,
    control: Control,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.orchestrator.release(self.control);
    }
}
