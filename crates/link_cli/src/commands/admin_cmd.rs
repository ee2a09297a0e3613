use std::{io::Write, path::PathBuf, sync::Arc};

use clap::Subcommand;
use colored::Colorize;
use link_controller::AdminController;
use plugin_client::PluginApi;
use tracing::{info, instrument};

use crate::commands::{connect, finish};
use crate::config::Settings;
use crate::draft::AdminDraft;
use crate::errors::Error;
use crate::terminal::{configuration_lines, TerminalHost};

#[cfg(test)]
#[path = "admin_cmd_tests.rs"]
mod tests;

/// Subcommands for the admin command
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Show the stored integration configuration
    Show,

    /// Apply a draft to the stored configuration and save it
    Save {
        /// TOML draft with the fields to change
        #[arg(short, long)]
        draft: PathBuf,
    },

    /// Test the connection to GitHub Enterprise
    Test {
        /// TOML draft with the URL and token to test instead of the stored ones
        #[arg(short, long)]
        draft: Option<PathBuf>,
    },

    /// Generate a new webhook secret
    GenerateSecret,

    /// Register webhooks on every mapped repository
    RegisterWebhooks,

    /// Discard edits and show the stored configuration again
    Cancel,
}

/// Execute the admin command against the configured plugin
#[instrument(skip(settings))]
pub async fn execute(cmd: AdminCommands, settings: &Settings) -> Result<(), Error> {
    let api = connect(settings)?;
    run(cmd, api, Arc::new(TerminalHost::stdout())).await
}

pub async fn run<W>(
    cmd: AdminCommands,
    api: Arc<dyn PluginApi>,
    host: Arc<TerminalHost<W>>,
) -> Result<(), Error>
where
    W: Write + Send + 'static,
{
    let result = match cmd {
        AdminCommands::Show => return print_stored(api.as_ref(), &host).await,
        AdminCommands::Save { draft } => {
            let controller = open(&api, &host).await?;
            apply_draft(&controller, &AdminDraft::load(&draft)?)?;
            finish(controller.save().await).map(|_| ())
        }
        AdminCommands::Test { draft } => {
            let controller = open(&api, &host).await?;
            if let Some(path) = draft {
                apply_draft(&controller, &AdminDraft::load(&path)?)?;
            }
            finish(controller.test_connection().await).map(|_| ())
        }
        AdminCommands::GenerateSecret => {
            let controller = open(&api, &host).await?;
            finish(controller.generate_secret().await).map(|generated| {
                if let Some(secret) = generated.secret.filter(|s| !s.trim().is_empty()) {
                    host.line(format!("Webhook secret: {}", secret.bold()));
                    host.line("Add it to a draft as webhook_secret and run admin save.");
                }
            })
        }
        AdminCommands::RegisterWebhooks => {
            let controller = open(&api, &host).await?;
            finish(controller.register_webhooks().await).map(|batch| {
                for target in batch.failed_targets() {
                    host.line(format!("  {} {}", "✗".red(), target.target));
                }
            })
        }
        AdminCommands::Cancel => {
            open(&api, &host).await?.cancel();
            Ok(())
        }
    };

    // The page reload of the browser form becomes a fresh listing.
    if host.take_reload() {
        info!("Reloading stored configuration");
        print_stored(api.as_ref(), &host).await?;
    }

    result
}

async fn open<W>(
    api: &Arc<dyn PluginApi>,
    host: &Arc<TerminalHost<W>>,
) -> Result<AdminController, Error>
where
    W: Write + Send + 'static,
{
    Ok(AdminController::open(api.clone(), host.clone()).await?)
}

fn apply_draft(controller: &AdminController, draft: &AdminDraft) -> Result<(), Error> {
    controller.edit(|form| draft.apply_to(form))
}

async fn print_stored<W: Write + Send>(
    api: &dyn PluginApi,
    host: &TerminalHost<W>,
) -> Result<(), Error> {
    let config = api.fetch_config().await?;
    for line in configuration_lines(&config) {
        host.line(line);
    }
    Ok(())
}
