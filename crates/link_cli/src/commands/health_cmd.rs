use std::{io::Write, sync::Arc};

use colored::Colorize;
use plugin_client::PluginApi;
use tracing::{info, instrument};

use crate::commands::connect;
use crate::config::Settings;
use crate::errors::Error;
use crate::terminal::TerminalHost;

#[cfg(test)]
#[path = "health_cmd_tests.rs"]
mod tests;

/// Checks that the plugin backend answers.
#[instrument(skip(settings))]
pub async fn execute(settings: &Settings) -> Result<(), Error> {
    let api = connect(settings)?;
    run(api, &TerminalHost::stdout()).await
}

pub async fn run<W: Write + Send>(
    api: Arc<dyn PluginApi>,
    host: &TerminalHost<W>,
) -> Result<(), Error> {
    let health = api.health().await?;

    info!(status = %health.status, version = ?health.version, "Plugin health");
    match health.version {
        Some(version) => host.line(format!("{} {} ({})", "✓".green(), health.status, version)),
        None => host.line(format!("{} {}", "✓".green(), health.status)),
    }
    Ok(())
}
