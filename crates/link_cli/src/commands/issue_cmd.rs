use std::{io::Write, sync::Arc};

use clap::Subcommand;
use link_controller::{IssueContext, IssuePanel};
use link_core::{IssueKey, PanelView};
use plugin_client::PluginApi;
use tracing::instrument;

use crate::commands::{connect, finish};
use crate::config::Settings;
use crate::errors::Error;
use crate::terminal::TerminalHost;

#[cfg(test)]
#[path = "issue_cmd_tests.rs"]
mod tests;

/// Subcommands for the issue command
#[derive(Subcommand, Debug)]
pub enum IssueCommands {
    /// Show the branches and pull requests linked to an issue
    Info {
        /// Issue key, e.g. PROJ-123
        issue_key: String,
    },

    /// Create a branch for an issue
    CreateBranch {
        /// Issue key, e.g. PROJ-123
        issue_key: String,

        /// Branch name; suggested from the issue summary when omitted
        #[arg(short, long)]
        name: Option<String>,

        /// Branch to fork from
        #[arg(short, long, default_value = "main")]
        base: String,

        /// Issue summary used to suggest the branch name
        #[arg(short, long)]
        summary: Option<String>,
    },

    /// Create a pull request for an issue
    CreatePr {
        /// Issue key, e.g. PROJ-123
        issue_key: String,

        /// Branch with the changes
        #[arg(long)]
        source: String,

        /// Branch to merge into
        #[arg(long, default_value = "main")]
        target: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },
}

/// Execute the issue command against the configured plugin
#[instrument(skip(settings))]
pub async fn execute(cmd: IssueCommands, settings: &Settings) -> Result<(), Error> {
    let api = connect(settings)?;
    run(
        cmd,
        api,
        Arc::new(TerminalHost::stdout()),
        settings.panel.issue_summary_fallback.as_deref(),
    )
    .await
}

pub async fn run<W>(
    cmd: IssueCommands,
    api: Arc<dyn PluginApi>,
    host: Arc<TerminalHost<W>>,
    summary_fallback: Option<&str>,
) -> Result<(), Error>
where
    W: Write + Send + 'static,
{
    match cmd {
        IssueCommands::Info { issue_key } => {
            let panel = open_panel(&issue_key, "", api, host)?;
            match panel.mount().await {
                PanelView::Error(message) => Err(Error::ActionFailed(message)),
                _ => Ok(()),
            }
        }
        IssueCommands::CreateBranch {
            issue_key,
            name,
            base,
            summary,
        } => {
            let summary = summary.as_deref().or(summary_fallback).unwrap_or_default();
            let panel = open_panel(&issue_key, summary, api, host)?;
            let flow = panel.branch();
            flow.open();
            match name {
                Some(name) => flow.edit(|form| form.branch_name = name),
                None => flow.autofill(),
            }
            flow.edit(|form| form.base_branch = base);

            finish(flow.submit().await).map(|_| ())
        }
        IssueCommands::CreatePr {
            issue_key,
            source,
            target,
            title,
            description,
        } => {
            let panel = open_panel(&issue_key, "", api, host)?;
            let flow = panel.pull_request();
            flow.open();
            flow.edit(|form| {
                form.source_branch = source;
                form.target_branch = target;
                form.title = title;
                form.description = description;
            });

            finish(flow.submit().await).map(|_| ())
        }
    }
}

fn open_panel<W>(
    issue_key: &str,
    summary: &str,
    api: Arc<dyn PluginApi>,
    host: Arc<TerminalHost<W>>,
) -> Result<IssuePanel, Error>
where
    W: Write + Send + 'static,
{
    let issue_key = IssueKey::parse(issue_key)?;
    Ok(IssuePanel::new(
        api,
        host,
        IssueContext::new(issue_key, summary),
    ))
}
