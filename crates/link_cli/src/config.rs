//! Settings file of the issue-link CLI.
//!
//! The settings are stored in TOML format and loaded from the path given with
//! `--config` or from `issue-link.toml` in the current directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use link_core::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default settings file name
pub const DEFAULT_CONFIG_FILENAME: &str = "issue-link.toml";

/// REST base written by `config init` when none is given.
pub const DEFAULT_REST_URL: &str = "http://localhost:2990/jira/rest/github-integration/1.0";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Settings of the CLI.
///
/// # Example TOML Configuration
///
/// ```toml
/// rest_url = "https://jira.example.com/rest/github-integration/1.0"
///
/// [panel]
/// issue_summary_fallback = "work in progress"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL all plugin REST paths are relative to.
    pub rest_url: String,

    #[serde(default)]
    pub panel: PanelSettings,
}

/// Issue panel settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSettings {
    /// Summary used to suggest branch names when none is given on the
    /// command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_summary_fallback: Option<String>,
}

impl Settings {
    pub fn new(rest_url: &str) -> Self {
        Self {
            rest_url: rest_url.to_string(),
            panel: PanelSettings::default(),
        }
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read, or
    /// contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading settings from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))
    }

    /// Saves the settings as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving settings to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Settings saved to {:?}", path);
        Ok(())
    }

    /// The REST base URL, trimmed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::RestUrlRequired` when the URL is blank.
    pub fn rest_url(&self) -> Result<&str, ValidationError> {
        match self.rest_url.trim() {
            "" => Err(ValidationError::RestUrlRequired),
            url => Ok(url),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_REST_URL)
    }
}

/// Resolves the settings file path: the given path, or
/// `./issue-link.toml`.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
