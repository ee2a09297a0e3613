use super::*;
use plugin_client::PluginClient;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE_PATH: &str = "/rest/github-integration/1.0";

fn stored_config() -> Value {
    json!({
        "githubEnterpriseUrl": "https://github.example.com",
        "githubApiUrl": "https://github.example.com/api/v3",
        "githubToken": "********",
        "trustCustomCertificates": false,
        "webhookUrl": "https://jira.example.com/hook",
        "webhookSecret": null,
        "branchNaming": "feature/{issueKey}-{summary}",
        "repositories": [
            {"jiraProject": "PROJ", "githubOwner": "acme", "githubRepo": "widgets", "defaultBranch": "main"}
        ],
        "transitionMappings": {"pr_merged": "31"}
    })
}

async fn setup(fetches: u64) -> (MockServer, Arc<dyn PluginApi>, Arc<TerminalHost<Vec<u8>>>) {
    colored::control::set_override(false);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/config", BASE_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_config()))
        .expect(fetches)
        .mount(&server)
        .await;

    let api = PluginClient::new(&format!("{}{}", server.uri(), BASE_PATH)).unwrap();
    (server, Arc::new(api), Arc::new(TerminalHost::new(Vec::new())))
}

fn write_draft(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("draft.toml");
    fs::write(&path, content).expect("Failed to write draft");
    path
}

#[tokio::test]
async fn test_show_prints_stored_configuration() {
    let (_server, api, host) = setup(1).await;

    run(AdminCommands::Show, api, host.clone()).await.unwrap();

    let output = host.contents();
    assert!(output.contains("GitHub Enterprise URL: https://github.example.com"));
    assert!(output.contains("Access token:          set"));
    assert!(output.contains("PROJ -> acme/widgets (main)"));
    assert!(!output.contains("********"));
}

#[tokio::test]
async fn test_save_applies_draft_and_reprints() {
    let (server, api, host) = setup(2).await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/config", BASE_PATH)))
        .and(body_partial_json(json!({
            "githubEnterpriseUrl": "https://ghe.internal",
            "githubApiUrl": "https://github.example.com/api/v3",
            "webhookSecret": "s3cret",
            "transitionMappings": {"pr_merged": "31", "pr_opened": "11"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_config()))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().expect("Failed to create temp directory");
    let draft = write_draft(
        &dir,
        "enterprise_url = \"https://ghe.internal\"\nwebhook_secret = \"s3cret\"\n\n[transitions]\npr_opened = \"11\"\n",
    );

    run(AdminCommands::Save { draft }, api, host.clone())
        .await
        .unwrap();

    let output = host.contents();
    assert!(output.contains("Saving configuration..."));
    assert!(output.contains(
        "✓ Configuration Saved: GitHub integration configuration saved successfully!"
    ));
    assert!(output.contains("Webhook URL:           https://jira.example.com/hook"));
}

#[tokio::test]
async fn test_save_keeps_stored_token_with_mask() {
    let (server, api, host) = setup(2).await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/config", BASE_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_config()))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().expect("Failed to create temp directory");
    let draft = write_draft(&dir, "");

    run(AdminCommands::Save { draft }, api, host).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|request| request.method.as_str() == "PUT")
        .unwrap();
    let body: Value = serde_json::from_slice(&put.body).unwrap();
    assert_eq!(body["githubToken"], "********");
    assert!(body.get("webhookSecret").is_none());
}

#[tokio::test]
async fn test_save_rejects_draft_without_mappings() {
    let (server, api, host) = setup(1).await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/config", BASE_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_config()))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().expect("Failed to create temp directory");
    let draft = write_draft(&dir, "mappings = []\n");

    let result = run(AdminCommands::Save { draft }, api, host.clone()).await;

    match result {
        Err(Error::ActionFailed(message)) => {
            assert_eq!(message, "At least one repository mapping is required")
        }
        other => panic!("Expected ActionFailed, got {:?}", other),
    }
    assert!(host
        .contents()
        .contains("At least one repository mapping is required"));
}

#[tokio::test]
async fn test_connection_rejected_by_backend() {
    let (server, api, host) = setup(1).await;
    Mock::given(method("POST"))
        .and(path(format!("{}/config/test-connection", BASE_PATH)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "Bad credentials"})),
        )
        .mount(&server)
        .await;

    let result = run(AdminCommands::Test { draft: None }, api, host.clone()).await;

    assert!(matches!(result, Err(Error::ActionFailed(ref m)) if m == "Bad credentials"));
    assert!(host.contents().contains("✗ Connection Failed: Bad credentials"));
}

#[tokio::test]
async fn test_connection_success() {
    let (server, api, host) = setup(1).await;
    Mock::given(method("POST"))
        .and(path(format!("{}/config/test-connection", BASE_PATH)))
        .and(body_partial_json(json!({"githubEnterpriseUrl": "https://github.example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    run(AdminCommands::Test { draft: None }, api, host.clone())
        .await
        .unwrap();

    assert!(host
        .contents()
        .contains("✓ Connection Successful: Successfully connected to GitHub Enterprise"));
}

#[tokio::test]
async fn test_generate_secret_prints_secret() {
    let (server, api, host) = setup(1).await;
    Mock::given(method("POST"))
        .and(path(format!("{}/config/generate-secret", BASE_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"secret": "abc123"})))
        .mount(&server)
        .await;

    run(AdminCommands::GenerateSecret, api, host.clone())
        .await
        .unwrap();

    let output = host.contents();
    assert!(output.contains("i Secret Generated"));
    assert!(output.contains("Webhook secret: abc123"));
}

#[tokio::test]
async fn test_partial_registration_does_not_reload() {
    let (server, api, host) = setup(1).await;
    Mock::given(method("POST"))
        .and(path(format!("{}/config/register-webhooks", BASE_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "successCount": 1,
            "totalCount": 2,
            "results": [
                {"repository": "acme/widgets", "success": true, "message": "created"},
                {"repository": "acme/infra", "success": false, "message": "Not Found"}
            ]
        })))
        .mount(&server)
        .await;

    run(AdminCommands::RegisterWebhooks, api, host.clone())
        .await
        .unwrap();

    let output = host.contents();
    assert!(output.contains("! Partial Success: Registered 1 of 2 webhooks"));
    assert!(output.contains("  ✗ acme/infra"));
    assert!(!output.contains("GitHub Enterprise URL"));
}

#[tokio::test]
async fn test_cancel_reprints_stored_configuration() {
    let (_server, api, host) = setup(2).await;

    run(AdminCommands::Cancel, api, host.clone()).await.unwrap();

    assert!(host
        .contents()
        .contains("GitHub Enterprise URL: https://github.example.com"));
}
