use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_init_writes_settings() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("issue-link.toml");

    execute(
        ConfigCommands::Init {
            rest_url: Some("https://jira.example.com/rest/github-integration/1.0".to_string()),
        },
        &path,
    )
    .expect("init should succeed");

    let settings = Settings::load(&path).unwrap();
    assert_eq!(
        settings.rest_url,
        "https://jira.example.com/rest/github-integration/1.0"
    );
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("issue-link.toml");
    fs::write(&path, "rest_url = \"keep-me\"\n").unwrap();

    let result = execute(ConfigCommands::Init { rest_url: None }, &path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("already exists"));
    } else {
        panic!("Expected Config error");
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "rest_url = \"keep-me\"\n");
}

#[test]
fn test_init_rejects_blank_url() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("issue-link.toml");

    let result = execute(
        ConfigCommands::Init {
            rest_url: Some("  ".to_string()),
        },
        &path,
    );

    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(!path.exists());
}

#[test]
fn test_show_missing_settings() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let result = execute(ConfigCommands::Show, &temp_dir.path().join("missing.toml"));

    assert!(matches!(result, Err(Error::Config(_))));
}
