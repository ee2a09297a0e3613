use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use link_cli::commands::{
    admin_cmd::{self, AdminCommands},
    config_cmd::{self, ConfigCommands},
    health_cmd,
    issue_cmd::{self, IssueCommands},
};
use link_cli::config::{get_config_path, Settings};

/// issue-link CLI: Link tracker issues to GitHub Enterprise branches and pull requests
#[derive(Parser)]
#[command(name = "issue-link")]
#[command(about = "Link tracker issues to GitHub Enterprise branches and pull requests", long_about = None)]
struct Cli {
    /// Path to the settings file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Config(ConfigCommands),

    #[command(subcommand)]
    Admin(AdminCommands),

    #[command(subcommand)]
    Issue(IssueCommands),

    /// Check that the plugin backend answers
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays clean.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("ISSUE_LINK_LOG"))
        .init();

    let cli = Cli::parse();
    let config_path = get_config_path(cli.config.as_deref());

    let result = match cli.command {
        Commands::Config(cmd) => config_cmd::execute(cmd, &config_path),
        Commands::Admin(cmd) => {
            let settings = Settings::load(&config_path)?;
            admin_cmd::execute(cmd, &settings).await
        }
        Commands::Issue(cmd) => {
            let settings = Settings::load(&config_path)?;
            issue_cmd::execute(cmd, &settings).await
        }
        Commands::Health => {
            let settings = Settings::load(&config_path)?;
            health_cmd::execute(&settings).await
        }
    };

    if let Err(e) = result {
        error!("Error: {e}");
        return Err(e.into());
    }

    Ok(())
}
