//! Controller of the admin configuration page.
//!
//! Holds the page-local [`ConfigForm`] and runs the page actions: save, test
//! connection, generate secret, register webhooks and cancel.

use std::sync::{Arc, Mutex, PoisonError};

use link_core::{
    validate_config, validate_connection_test, BatchResult, ConfigForm, OperationResult,
    RemoteConfiguration, Status,
};
use plugin_client::{Endpoint, Error, GeneratedSecret, PluginApi};
use tracing::{info, instrument};

use crate::batch_coordinator::{BatchRegistrationCoordinator, RELOAD_DELAY};
use crate::host::{Control, Host, Notification, StatusRegion};
use crate::orchestrator::{Action, Presentation, RequestOrchestrator};

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;

const SAVE: Action = Action {
    control: Control::SaveConfig,
    region: Some(StatusRegion::SaveConfig),
    working: "Saving configuration...",
    failure_title: "Configuration Error",
    fallback: "Failed to save configuration",
};

const TEST_CONNECTION: Action = Action {
    control: Control::TestConnection,
    region: Some(StatusRegion::TestConnection),
    working: "Testing connection...",
    failure_title: "Connection Failed",
    fallback: "Connection test failed",
};

const GENERATE_SECRET: Action = Action {
    control: Control::GenerateSecret,
    region: None,
    working: "",
    failure_title: "Generation Failed",
    fallback: "Failed to generate secret",
};

const CONNECTION_REJECTED: &str = "Failed to connect to GitHub Enterprise";

const CONNECTION_OK: &str = "Successfully connected to GitHub Enterprise";

/// The admin configuration page.
///
/// The form is only locked for short, synchronous edits and never while a
/// request is awaited.
pub struct AdminController {
    api: Arc<dyn PluginApi>,
    orchestrator: Arc<RequestOrchestrator>,
    batch: BatchRegistrationCoordinator,
    form: Mutex<ConfigForm>,
}

impl AdminController {
    pub fn new(api: Arc<dyn PluginApi>, host: Arc<dyn Host>, form: ConfigForm) -> Self {
        let orchestrator = Arc::new(RequestOrchestrator::new(host));
        let batch = BatchRegistrationCoordinator::new(api.clone(), orchestrator.clone());
        Self {
            api,
            orchestrator,
            batch,
            form: Mutex::new(form),
        }
    }

    /// Opens the page: fetches the stored configuration and seeds the form.
    ///
    /// # Errors
    ///
    /// Returns the client error when the configuration cannot be fetched.
    #[instrument(skip_all)]
    pub async fn open(api: Arc<dyn PluginApi>, host: Arc<dyn Host>) -> Result<Self, Error> {
        let remote = api.fetch_config().await?;
        info!(
            mappings = remote.mappings.len(),
            token_set = remote.has_token(),
            "Loaded stored configuration"
        );
        Ok(Self::new(api, host, ConfigForm::from_remote(&remote)))
    }

    /// Reads or edits the form.
    pub fn edit<R>(&self, f: impl FnOnce(&mut ConfigForm) -> R) -> R {
        let mut form = self.form.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut form)
    }

    /// True while `control`'s action is running.
    pub fn is_busy(&self, control: Control) -> bool {
        self.orchestrator.is_busy(control)
    }

    /// Validates and saves the form.
    ///
    /// On success the typed secrets become "is set" markers and the page
    /// reloads after [`RELOAD_DELAY`]. A validation failure is rendered
    /// inline and returned as [`OperationResult::Failure`] without any
    /// request being made.
    #[instrument(skip(self))]
    pub async fn save(&self) -> OperationResult<RemoteConfiguration> {
        let config = self.edit(|form| form.to_configuration());
        if let Err(error) = validate_config(&config) {
            return self
                .orchestrator
                .reject(StatusRegion::SaveConfig, &error);
        }

        let outcome = self
            .orchestrator
            .execute(&SAVE, self.api.save_config(&config), |_| {
                Presentation::new(
                    Status::Success("Configuration saved successfully".to_string()),
                    Notification::success(
                        "Configuration Saved",
                        "GitHub integration configuration saved successfully!",
                    ),
                )
            })
            .await;

        if outcome.is_success() {
            self.edit(|form| form.mark_saved());
            tokio::time::sleep(RELOAD_DELAY).await;
            self.orchestrator.host().reload_page();
        }

        outcome
    }

    /// Tests the connection to GitHub Enterprise with the URL and token currently typed.
    ///
    /// A connection test the backend ran but reported as failed is a failure carrying
    /// the backend message. The success payload is the message shown.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> OperationResult<String> {
        let test = self.edit(|form| form.connection_test());
        if let Err(error) = validate_connection_test(&test) {
            return self
                .orchestrator
                .reject(StatusRegion::TestConnection, &error);
        }

        let request = async {
            let response = self.api.test_connection(&test).await?;
            if !response.success {
                return Err(Error::Rejected {
                    endpoint: Endpoint::TestConnection,
                    message: Some(
                        response
                            .message
                            .filter(|m| !m.trim().is_empty())
                            .unwrap_or_else(|| CONNECTION_REJECTED.to_string()),
                    ),
                });
            }
            Ok(response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| CONNECTION_OK.to_string()))
        };

        self.orchestrator
            .execute(&TEST_CONNECTION, request, |message| {
                Presentation::new(
                    Status::Success("Connection successful".to_string()),
                    Notification::success("Connection Successful", message.clone()),
                )
            })
            .await
    }

    /// Asks the backend for a fresh webhook secret and puts it, revealed,
    /// into the form. The secret is only stored on the next save.
    #[instrument(skip(self))]
    pub async fn generate_secret(&self) -> OperationResult<GeneratedSecret> {
        let outcome = self
            .orchestrator
            .execute(&GENERATE_SECRET, self.api.generate_secret(), |generated| {
                match generated_value(generated) {
                    Some(_) => Presentation::new(
                        Status::Idle,
                        Notification::info(
                            "Secret Generated",
                            "A new webhook secret has been generated. Click Save to apply.",
                        ),
                    ),
                    None => Presentation::silent(Status::Idle),
                }
            })
            .await;

        if let OperationResult::Success(generated) = &outcome {
            if let Some(secret) = generated_value(generated) {
                self.edit(|form| {
                    form.webhook_secret.set(secret);
                    form.webhook_secret.reveal();
                });
            }
        }

        outcome
    }

    /// Registers webhooks on every mapped repository.
    pub async fn register_webhooks(&self) -> OperationResult<BatchResult> {
        self.batch.register_all().await
    }

    /// Discards form edits by reloading the page.
    pub fn cancel(&self) {
        self.orchestrator.host().reload_page();
    }
}

fn generated_value(generated: &GeneratedSecret) -> Option<&str> {
    generated
        .secret
        .as_deref()
        .filter(|secret| !secret.trim().is_empty())
}
