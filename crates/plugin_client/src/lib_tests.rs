//! Unit tests for the plugin_client crate.

use super::*;
use link_core::{Mapping, TransitionMap};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE_PATH: &str = "/rest/github-integration/1.0";

async fn client_for(server: &MockServer) -> PluginClient {
    PluginClient::new(&format!("{}{}", server.uri(), BASE_PATH)).unwrap()
}

fn sample_configuration(token: Option<&str>) -> Configuration {
    Configuration {
        enterprise_url: "https://ghe.example.com".to_string(),
        api_url: "https://ghe.example.com/api/v3".to_string(),
        token: token.map(|t| SecretString::from(t.to_string())),
        trust_custom_certificates: false,
        webhook_url: "".to_string(),
        webhook_secret: None,
        branch_naming_template: "feature/{issueKey}-{summary}".to_string(),
        mappings: vec![Mapping {
            project_key: "PROJ".to_string(),
            repo_owner: "acme".to_string(),
            repo_name: "widgets".to_string(),
            default_branch: "main".to_string(),
        }],
        transition_mappings: TransitionMap::default(),
    }
}

mod construction_tests {
    use super::*;

    #[test]
    fn test_rejects_relative_url() {
        let result = PluginClient::new("/rest/github-integration/1.0");

        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = PluginClient::new("ftp://jira.example.com/rest");

        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_trims_base_url() {
        let client = PluginClient::new("  https://jira.example.com/rest/x/1.0  ").unwrap();

        assert_eq!(client.base_url().as_str(), "https://jira.example.com/rest/x/1.0");
    }

    #[test]
    fn test_url_appends_segments_after_trailing_slash() {
        let client = PluginClient::new("https://jira.example.com/rest/x/1.0/").unwrap();

        let url = client.url(&["config", "test-connection"]).unwrap();

        assert_eq!(
            url.as_str(),
            "https://jira.example.com/rest/x/1.0/config/test-connection"
        );
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = PluginClient::new("https://jira.example.com/rest/x/1.0").unwrap();

        let url = client.url(&["issue", "A B/C", "github-info"]).unwrap();

        assert_eq!(
            url.as_str(),
            "https://jira.example.com/rest/x/1.0/issue/A%20B%2FC/github-info"
        );
    }
}

#[tokio::test]
async fn test_fetch_config_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE_PATH}/config")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "githubEnterpriseUrl": "https://ghe.example.com",
            "githubApiUrl": null,
            "githubToken": "********",
            "trustCustomCertificates": true,
            "webhookSecret": null,
            "repositories": [
                {"jiraProject": "PROJ", "githubOwner": "acme", "githubRepo": "widgets", "defaultBranch": "main"}
            ]
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let config = client.fetch_config().await.unwrap();

    assert_eq!(config.enterprise_url, "https://ghe.example.com");
    assert_eq!(config.api_url, "");
    assert!(config.has_token());
    assert!(!config.has_webhook_secret());
    assert!(config.trust_custom_certificates);
    assert_eq!(config.mappings.len(), 1);
}

#[tokio::test]
async fn test_fetch_config_forbidden_extracts_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE_PATH}/config")))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"error": "Administrator access required"})),
        )
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let err = client.fetch_config().await.unwrap_err();

    match &err {
        Error::Api {
            endpoint,
            status,
            message,
        } => {
            assert_eq!(*endpoint, Endpoint::FetchConfig);
            assert_eq!(*status, 403);
            assert_eq!(message.as_deref(), Some("Administrator access required"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_save_config_sends_token_when_entered() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{BASE_PATH}/config")))
        .and(body_json(json!({
            "githubEnterpriseUrl": "https://ghe.example.com",
            "githubApiUrl": "https://ghe.example.com/api/v3",
            "githubToken": "ghp_secret",
            "trustCustomCertificates": false,
            "webhookUrl": "",
            "branchNaming": "feature/{issueKey}-{summary}",
            "repositories": [
                {"jiraProject": "PROJ", "githubOwner": "acme", "githubRepo": "widgets", "defaultBranch": "main"}
            ],
            "transitionMappings": {
                "pr_opened": "",
                "pr_merged": "",
                "pr_closed": "",
                "pr_reopened": ""
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "githubEnterpriseUrl": "https://ghe.example.com",
            "githubToken": "********"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let saved = client
        .save_config(&sample_configuration(Some("ghp_secret")))
        .await
        .unwrap();

    assert!(saved.has_token());
}

#[tokio::test]
async fn test_save_config_joins_validation_errors() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{BASE_PATH}/config")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["GitHub token is required", "Repository mapping 1: Jira project key is required"]
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let err = client
        .save_config(&sample_configuration(None))
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message("Failed to save configuration"),
        "GitHub token is required; Repository mapping 1: Jira project key is required"
    );
}

#[tokio::test]
async fn test_test_connection_sends_null_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE_PATH}/config/test-connection")))
        .and(body_json(json!({
            "githubEnterpriseUrl": "https://ghe.example.com",
            "githubToken": null,
            "trustCustomCertificates": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Connection failed - check logs for details"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    let test = ConnectionTest {
        enterprise_url: "https://ghe.example.com".to_string(),
        token: None,
        trust_custom_certificates: false,
    };

    let response = client.test_connection(&test).await.unwrap();

    assert!(!response.success);
    assert_eq!(
        response.message.as_deref(),
        Some("Connection failed - check logs for details")
    );
}

#[tokio::test]
async fn test_test_connection_error_prefers_message_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE_PATH}/config/test-connection")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "GitHub Enterprise URL is required"
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    let test = ConnectionTest {
        enterprise_url: "".to_string(),
        token: None,
        trust_custom_certificates: false,
    };

    let err = client.test_connection(&test).await.unwrap_err();

    assert_eq!(err.message(), Some("GitHub Enterprise URL is required"));
}

#[tokio::test]
async fn test_test_connection_bad_request_uses_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE_PATH}/config/test-connection")))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "GitHub token is required"})),
        )
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    let test = ConnectionTest {
        enterprise_url: "https://ghe.example.com".to_string(),
        token: None,
        trust_custom_certificates: false,
    };

    let err = client.test_connection(&test).await.unwrap_err();

    assert_eq!(err.message(), Some("GitHub token is required"));
    assert_eq!(
        err.user_message("Connection test failed"),
        "GitHub token is required"
    );
}

#[tokio::test]
async fn test_generate_secret_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE_PATH}/config/generate-secret")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"secret": "abc123"})))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let generated = client.generate_secret().await.unwrap();

    assert_eq!(generated.secret.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_register_webhooks_decodes_batch_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE_PATH}/config/register-webhooks")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "successCount": 1,
            "totalCount": 2,
            "results": [
                {"repository": "acme/widgets", "success": true, "message": "Webhook registered"},
                {"repository": "acme/gadgets", "success": false, "message": "Not Found"}
            ]
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let batch = client.register_webhooks().await.unwrap();

    assert_eq!(batch.success_count, 1);
    assert_eq!(batch.total_count, 2);
    assert_eq!(batch.failed_targets().count(), 1);
}

#[tokio::test]
async fn test_register_webhooks_raw_body_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE_PATH}/config/register-webhooks")))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let err = client.register_webhooks().await.unwrap_err();

    assert_eq!(err.user_message("Failed to register webhooks"), "Bad Gateway");
}

#[tokio::test]
async fn test_issue_info_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE_PATH}/issue/PROJ-123/github-info")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issueKey": "PROJ-123",
            "branches": [{"name": "feature/PROJ-123-login", "url": "https://ghe/acme/widgets/tree/feature/PROJ-123-login"}],
            "pullRequests": null
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    let key = IssueKey::parse("proj-123").unwrap();

    let info = client.issue_info(&key).await.unwrap();

    assert_eq!(info.branches.len(), 1);
    assert!(info.pull_requests.is_empty());
}

#[tokio::test]
async fn test_create_branch_sends_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE_PATH}/branch/create")))
        .and(body_json(json!({
            "issueKey": "PROJ-1",
            "baseBranch": "develop",
            "branchName": "feature/PROJ-1-login"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/feature/PROJ-1-login",
            "sha": "abc",
            "url": "https://ghe/api/v3/repos/acme/widgets/git/refs/heads/feature/PROJ-1-login"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    let request = CreateBranchRequest {
        issue_key: "PROJ-1".to_string(),
        base_branch: "develop".to_string(),
        branch_name: "feature/PROJ-1-login".to_string(),
    };

    let created = client.create_branch(&request).await.unwrap();

    assert_eq!(created.sha.as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_create_branch_conflict_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE_PATH}/branch/create")))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Reference already exists"})),
        )
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    let request = CreateBranchRequest {
        issue_key: "PROJ-1".to_string(),
        base_branch: "main".to_string(),
        branch_name: "feature/PROJ-1".to_string(),
    };

    let err = client.create_branch(&request).await.unwrap_err();

    assert_eq!(
        err.user_message("Failed to create branch"),
        "Reference already exists"
    );
}

#[tokio::test]
async fn test_create_pull_request_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE_PATH}/pr/create")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 42,
            "title": "Login",
            "url": "https://ghe/acme/widgets/pull/42",
            "state": "open"
        })))
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    let request = CreatePullRequestRequest {
        issue_key: "PROJ-1".to_string(),
        source_branch: "feature/PROJ-1-login".to_string(),
        target_branch: "main".to_string(),
        title: "Login".to_string(),
        description: "".to_string(),
    };

    let created = client.create_pull_request(&request).await.unwrap();

    assert_eq!(created.number, 42);
    assert_eq!(created.url, "https://ghe/acme/widgets/pull/42");
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE_PATH}/health")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let err = client.health().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Deserialization {
            endpoint: Endpoint::Health,
            ..
        }
    ));
}

#[tokio::test]
async fn test_health_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE_PATH}/health")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "version": "1.0.0"})),
        )
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let health = client.health().await.unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.version.as_deref(), Some("1.0.0"));
}

#[tokio::test]
async fn test_transport_failure() {
    // Nothing listens on port 1.
    let client = PluginClient::new("http://127.0.0.1:1/rest/github-integration/1.0").unwrap();

    let err = client.generate_secret().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Transport {
            endpoint: Endpoint::GenerateSecret,
            ..
        }
    ));
    assert_eq!(
        err.user_message("Failed to generate secret"),
        "Failed to generate secret"
    );
}
