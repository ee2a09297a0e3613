//! REST client for the issue tracker plugin's GitHub integration endpoints.
//!
//! [`PluginApi`] is the seam the controllers depend on; [`PluginClient`] is
//! the reqwest-backed implementation. All failures are reported as
//! [`Error`], with the most specific backend message already extracted.

use async_trait::async_trait;
use link_core::{
    BatchResult, Configuration, ConnectionTest, IssueGithubInfo, IssueKey, RemoteConfiguration,
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

pub mod errors;
pub mod models;

pub use errors::{extract_error_message, Error};
pub use models::{
    ConnectionTestResponse, CreateBranchRequest, CreatePullRequestRequest, CreatedBranch,
    CreatedPullRequest, Endpoint, ErrorField, GeneratedSecret, HealthStatus,
};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Operations offered by the plugin backend.
#[async_trait]
pub trait PluginApi: Send + Sync {
    /// Fetches the stored configuration with secrets masked.
    async fn fetch_config(&self) -> Result<RemoteConfiguration, Error>;

    /// Stores `config` and returns the configuration as persisted.
    async fn save_config(&self, config: &Configuration) -> Result<RemoteConfiguration, Error>;

    /// Tests the connection to GitHub Enterprise with the given credentials.
    ///
    /// A connection test that ran but failed is `Ok` with `success == false`.
    async fn test_connection(&self, test: &ConnectionTest)
        -> Result<ConnectionTestResponse, Error>;

    async fn generate_secret(&self) -> Result<GeneratedSecret, Error>;

    /// Registers webhooks on every mapped repository.
    async fn register_webhooks(&self) -> Result<BatchResult, Error>;

    async fn issue_info(&self, issue_key: &IssueKey) -> Result<IssueGithubInfo, Error>;

    async fn create_branch(&self, request: &CreateBranchRequest) -> Result<CreatedBranch, Error>;

    async fn create_pull_request(
        &self,
        request: &CreatePullRequestRequest,
    ) -> Result<CreatedPullRequest, Error>;

    async fn health(&self) -> Result<HealthStatus, Error>;
}

/// Client for the plugin REST API rooted at a base URL such as
/// `https://jira.example.com/rest/github-integration/1.0`.
///
/// ## Examples
///
/// ```rust
/// use plugin_client::PluginClient;
///
/// let client = PluginClient::new("https://jira.example.com/rest/github-integration/1.0").unwrap();
/// assert_eq!(client.base_url().path(), "/rest/github-integration/1.0");
///
/// assert!(PluginClient::new("jira.example.com").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PluginClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PluginClient {
    /// Creates a client with a default `reqwest::Client`.
    pub fn new(rest_url: &str) -> Result<Self, Error> {
        Self::with_http_client(rest_url, reqwest::Client::new())
    }

    /// Creates a client that sends requests through `http`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] when `rest_url` is not an absolute
    /// HTTP or HTTPS URL.
    pub fn with_http_client(rest_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let trimmed = rest_url.trim();
        let base_url =
            Url::parse(trimmed).map_err(|_| Error::InvalidBaseUrl(trimmed.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(trimmed.to_string()));
        }

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends `request` and decodes a successful response as `T`.
    ///
    /// Non-success statuses become [`Error::Api`] carrying the message
    /// extracted with the endpoint's preferred error field.
    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
    ) -> Result<T, Error> {
        let response = request.send().await.map_err(|e| {
            warn!(endpoint = %endpoint, error = %e, "Request did not complete");
            Error::Transport {
                endpoint,
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| Error::Transport {
            endpoint,
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            let message = extract_error_message(&body, endpoint.error_field());
            warn!(
                endpoint = %endpoint,
                status = status.as_u16(),
                message = message.as_deref().unwrap_or(""),
                "Request failed"
            );
            return Err(Error::Api {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        debug!(endpoint = %endpoint, status = status.as_u16(), "Request succeeded");
        serde_json::from_str(&body).map_err(|source| Error::Deserialization { endpoint, source })
    }
}

#[async_trait]
impl PluginApi for PluginClient {
    #[instrument(skip(self))]
    async fn fetch_config(&self) -> Result<RemoteConfiguration, Error> {
        let url = self.url(&["config"])?;
        self.send(Endpoint::FetchConfig, self.http.get(url)).await
    }

    #[instrument(skip(self, config))]
    async fn save_config(&self, config: &Configuration) -> Result<RemoteConfiguration, Error> {
        let url = self.url(&["config"])?;
        self.send(Endpoint::SaveConfig, self.http.put(url).json(config))
            .await
    }

    #[instrument(skip(self, test))]
    async fn test_connection(
        &self,
        test: &ConnectionTest,
    ) -> Result<ConnectionTestResponse, Error> {
        let url = self.url(&["config", "test-connection"])?;
        self.send(Endpoint::TestConnection, self.http.post(url).json(test))
            .await
    }

    #[instrument(skip(self))]
    async fn generate_secret(&self) -> Result<GeneratedSecret, Error> {
        let url = self.url(&["config", "generate-secret"])?;
        self.send(Endpoint::GenerateSecret, self.http.post(url))
            .await
    }

    #[instrument(skip(self))]
    async fn register_webhooks(&self) -> Result<BatchResult, Error> {
        let url = self.url(&["config", "register-webhooks"])?;
        self.send(Endpoint::RegisterWebhooks, self.http.post(url))
            .await
    }

    #[instrument(skip(self), fields(issue_key = %issue_key))]
    async fn issue_info(&self, issue_key: &IssueKey) -> Result<IssueGithubInfo, Error> {
        let url = self.url(&["issue", issue_key.as_str(), "github-info"])?;
        self.send(Endpoint::IssueInfo, self.http.get(url)).await
    }

    #[instrument(skip(self, request), fields(issue_key = %request.issue_key, branch = %request.branch_name))]
    async fn create_branch(&self, request: &CreateBranchRequest) -> Result<CreatedBranch, Error> {
        let url = self.url(&["branch", "create"])?;
        self.send(Endpoint::CreateBranch, self.http.post(url).json(request))
            .await
    }

    #[instrument(skip(self, request), fields(issue_key = %request.issue_key, source = %request.source_branch))]
    async fn create_pull_request(
        &self,
        request: &CreatePullRequestRequest,
    ) -> Result<CreatedPullRequest, Error> {
        let url = self.url(&["pr", "create"])?;
        self.send(Endpoint::CreatePullRequest, self.http.post(url).json(request))
            .await
    }

    #[instrument(skip(self))]
    async fn health(&self) -> Result<HealthStatus, Error> {
        let url = self.url(&["health"])?;
        self.send(Endpoint::Health, self.http.get(url)).await
    }
}
