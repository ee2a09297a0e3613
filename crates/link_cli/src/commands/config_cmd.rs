use std::path::Path;

use clap::Subcommand;
use tracing::{debug, error, info, instrument};

use crate::config::Settings;
use crate::errors::Error;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create the settings file
    Init {
        /// REST base URL of the plugin
        #[arg(short, long)]
        rest_url: Option<String>,
    },

    /// Show the current settings
    Show,
}

/// Execute the config command
#[instrument]
pub fn execute(cmd: ConfigCommands, config_path: &Path) -> Result<(), Error> {
    match cmd {
        ConfigCommands::Init { rest_url } => init_config(config_path, rest_url.as_deref()),
        ConfigCommands::Show => show_config(config_path),
    }
}

fn init_config(config_path: &Path, rest_url: Option<&str>) -> Result<(), Error> {
    debug!(message = "Initializing settings", path = ?config_path);

    if config_path.exists() {
        let err = Error::Config(format!(
            "Configuration file already exists at {:?}",
            config_path
        ));
        error!(
            message = "Configuration file already exists",
            path = ?config_path,
            error = ?err
        );
        return Err(err);
    }

    let settings = match rest_url {
        Some(url) => Settings::new(url),
        None => Settings::default(),
    };
    // Refuse to write a file every other command would reject.
    settings.rest_url()?;

    if let Err(e) = settings.save(config_path) {
        error!(message = "Failed to save settings", path = ?config_path, error = ?e);
        return Err(e);
    }

    info!(message = "Settings initialized", path = ?config_path);
    println!("Settings initialized at {:?}", config_path);
    Ok(())
}

fn show_config(config_path: &Path) -> Result<(), Error> {
    let settings = Settings::load(config_path)?;
    let content = toml::to_string_pretty(&settings)
        .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

    println!("{}", content);
    Ok(())
}
