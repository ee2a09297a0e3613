//! Fakes shared by the controller tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use link_core::{
    BatchResult, Configuration, ConnectionTest, IssueGithubInfo, IssueKey, PanelView,
    RemoteConfiguration, Status,
};
use plugin_client::{
    ConnectionTestResponse, CreateBranchRequest, CreatePullRequestRequest, CreatedBranch,
    CreatedPullRequest, Endpoint, Error, GeneratedSecret, HealthStatus, PluginApi,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Notify;

use crate::host::{Control, Dialog, Host, Notification, StatusRegion};

/// Canned answer of the fake backend.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(Value),
    Api { status: u16, message: Option<String> },
    Transport,
}

/// In-memory [`PluginApi`] that records every call.
#[derive(Default)]
pub(crate) struct FakeApi {
    replies: Mutex<HashMap<Endpoint, Reply>>,
    gates: Mutex<HashMap<Endpoint, Arc<Notify>>>,
    calls: Mutex<Vec<(Endpoint, Value)>>,
}

impl FakeApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(&self, endpoint: Endpoint, reply: Reply) {
        self.replies.lock().unwrap().insert(endpoint, reply);
    }

    pub(crate) fn reply_json(&self, endpoint: Endpoint, body: Value) {
        self.reply(endpoint, Reply::Json(body));
    }

    /// Holds calls to `endpoint` until the returned handle is notified.
    pub(crate) fn hold(&self, endpoint: Endpoint) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(endpoint, gate.clone());
        gate
    }

    pub(crate) fn calls(&self) -> Vec<(Endpoint, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| *called == endpoint)
            .count()
    }

    pub(crate) fn last_body(&self, endpoint: Endpoint) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(called, _)| *called == endpoint)
            .map(|(_, body)| body.clone())
    }

    async fn answer<T: DeserializeOwned>(&self, endpoint: Endpoint, body: Value) -> Result<T, Error> {
        self.calls.lock().unwrap().push((endpoint, body));

        let gate = self.gates.lock().unwrap().get(&endpoint).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&endpoint)
            .cloned()
            .unwrap_or(Reply::Api {
                status: 500,
                message: None,
            });

        match reply {
            Reply::Json(value) => serde_json::from_value(value)
                .map_err(|source| Error::Deserialization { endpoint, source }),
            Reply::Api { status, message } => Err(Error::Api {
                endpoint,
                status,
                message,
            }),
            Reply::Transport => Err(Error::Transport {
                endpoint,
                reason: "connection refused".to_string(),
            }),
        }
    }
}

#[async_trait]
impl PluginApi for FakeApi {
    async fn fetch_config(&self) -> Result<RemoteConfiguration, Error> {
        self.answer(Endpoint::FetchConfig, Value::Null).await
    }

    async fn save_config(&self, config: &Configuration) -> Result<RemoteConfiguration, Error> {
        let body = serde_json::to_value(config).unwrap();
        self.answer(Endpoint::SaveConfig, body).await
    }

    async fn test_connection(
        &self,
        test: &ConnectionTest,
    ) -> Result<ConnectionTestResponse, Error> {
        let body = serde_json::to_value(test).unwrap();
        self.answer(Endpoint::TestConnection, body).await
    }

    async fn generate_secret(&self) -> Result<GeneratedSecret, Error> {
        self.answer(Endpoint::GenerateSecret, Value::Null).await
    }

    async fn register_webhooks(&self) -> Result<BatchResult, Error> {
        self.answer(Endpoint::RegisterWebhooks, Value::Null).await
    }

    async fn issue_info(&self, issue_key: &IssueKey) -> Result<IssueGithubInfo, Error> {
        self.answer(Endpoint::IssueInfo, Value::String(issue_key.to_string()))
            .await
    }

    async fn create_branch(&self, request: &CreateBranchRequest) -> Result<CreatedBranch, Error> {
        let body = serde_json::to_value(request).unwrap();
        self.answer(Endpoint::CreateBranch, body).await
    }

    async fn create_pull_request(
        &self,
        request: &CreatePullRequestRequest,
    ) -> Result<CreatedPullRequest, Error> {
        let body = serde_json::to_value(request).unwrap();
        self.answer(Endpoint::CreatePullRequest, body).await
    }

    async fn health(&self) -> Result<HealthStatus, Error> {
        self.answer(Endpoint::Health, Value::Null).await
    }
}

/// Everything a controller asked the host to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostEvent {
    Notify(Notification),
    ShowDialog(Dialog),
    HideDialog(Dialog),
    Reload,
    Control(Control, bool),
    Status(StatusRegion, Status),
    Panel(PanelView),
}

#[derive(Default)]
pub(crate) struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Notify(notification) => Some(notification),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn statuses(&self, region: StatusRegion) -> Vec<Status> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Status(r, status) if r == region => Some(status),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn last_status(&self, region: StatusRegion) -> Option<Status> {
        self.statuses(region).pop()
    }

    pub(crate) fn control_changes(&self, control: Control) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Control(c, enabled) if c == control => Some(enabled),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn reloads(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == HostEvent::Reload)
            .count()
    }

    pub(crate) fn last_panel(&self) -> Option<PanelView> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Panel(view) => Some(view),
                _ => None,
            })
            .next_back()
    }

    fn record(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Host for RecordingHost {
    fn notify(&self, notification: Notification) {
        self.record(HostEvent::Notify(notification));
    }

    fn show_dialog(&self, dialog: Dialog) {
        self.record(HostEvent::ShowDialog(dialog));
    }

    fn hide_dialog(&self, dialog: Dialog) {
        self.record(HostEvent::HideDialog(dialog));
    }

    fn reload_page(&self) {
        self.record(HostEvent::Reload);
    }

    fn set_control_enabled(&self, control: Control, enabled: bool) {
        self.record(HostEvent::Control(control, enabled));
    }

    fn set_status(&self, region: StatusRegion, status: &Status) {
        self.record(HostEvent::Status(region, status.clone()));
    }

    fn render_panel(&self, view: &PanelView) {
        self.record(HostEvent::Panel(view.clone()));
    }
}
