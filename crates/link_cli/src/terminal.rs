//! Terminal rendition of the host platform.
//!
//! Notifications, status text and panel contents are printed as lines.
//! Dialogs and control state have no terminal counterpart and are only
//! traced. A page reload is recorded; the command that triggered it
//! re-fetches and prints the stored configuration afterwards.

use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, PoisonError,
    },
};

use colored::Colorize;
use link_controller::{Control, Dialog, Host, Notification, NotificationLevel, StatusRegion};
use link_core::{PanelView, RemoteConfiguration, Status, TransitionEvent};
use tracing::{debug, warn};

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod tests;

pub struct TerminalHost<W> {
    out: Mutex<W>,
    reload_requested: AtomicBool,
}

impl TerminalHost<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalHost<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            reload_requested: AtomicBool::new(false),
        }
    }

    /// Prints one line.
    pub fn line(&self, text: impl AsRef<str>) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{}", text.as_ref()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }

    /// Returns whether a reload was requested since the last call, and
    /// clears the request.
    pub fn take_reload(&self) -> bool {
        self.reload_requested.swap(false, Ordering::SeqCst)
    }
}

impl TerminalHost<Vec<u8>> {
    /// Everything printed so far.
    pub fn contents(&self) -> String {
        let out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl<W: Write + Send> Host for TerminalHost<W> {
    fn notify(&self, notification: Notification) {
        let marker = match notification.level {
            NotificationLevel::Success => "✓".green(),
            NotificationLevel::Error => "✗".red(),
            NotificationLevel::Warning => "!".yellow(),
            NotificationLevel::Info => "i".blue(),
        };
        self.line(format!(
            "{} {}: {}",
            marker,
            notification.title.bold(),
            notification.body
        ));
        if let Some(link) = &notification.link {
            self.line(format!("  {}", link.underline()));
        }
    }

    fn show_dialog(&self, dialog: Dialog) {
        debug!(?dialog, "Dialog shown");
    }

    fn hide_dialog(&self, dialog: Dialog) {
        debug!(?dialog, "Dialog hidden");
    }

    fn reload_page(&self) {
        self.reload_requested.store(true, Ordering::SeqCst);
    }

    fn set_control_enabled(&self, control: Control, enabled: bool) {
        debug!(?control, enabled, "Control state changed");
    }

    fn set_status(&self, region: StatusRegion, status: &Status) {
        debug!(?region, ?status, "Status changed");
        match status {
            Status::Idle => {}
            Status::Working(text) => self.line(text.dimmed().to_string()),
            Status::Success(text) => self.line(text.green().to_string()),
            Status::Warning(text) => self.line(text.yellow().to_string()),
            Status::Error(text) => self.line(text.red().to_string()),
        }
    }

    fn render_panel(&self, view: &PanelView) {
        for line in panel_lines(view) {
            self.line(line);
        }
    }
}

/// Lines printed for a panel snapshot.
pub fn panel_lines(view: &PanelView) -> Vec<String> {
    match view {
        PanelView::Loading => vec!["Loading...".dimmed().to_string()],
        PanelView::NoActivity => vec![
            "No GitHub activity for this issue yet.".to_string(),
            "Create a branch to get started!".to_string(),
        ],
        PanelView::Activity {
            branches,
            pull_requests,
        } => {
            let mut lines = Vec::new();
            if !branches.is_empty() {
                lines.push("Branches".bold().to_string());
                for branch in branches {
                    lines.push(format!("  {} {}", branch.name, branch.url.dimmed()));
                }
            }
            if !pull_requests.is_empty() {
                lines.push("Pull Requests".bold().to_string());
                for pr in pull_requests {
                    lines.push(format!(
                        "  #{} {} [{}] {}",
                        pr.number,
                        pr.title,
                        pr.state,
                        pr.url.dimmed()
                    ));
                }
            }
            lines
        }
        PanelView::Error(message) => vec![message.red().to_string()],
    }
}

/// Lines printed for the stored configuration. Write-only fields are only
/// reported as set or not set.
pub fn configuration_lines(config: &RemoteConfiguration) -> Vec<String> {
    let set_marker = |present: bool| if present { "set" } else { "not set" };

    let mut lines = vec![
        format!("GitHub Enterprise URL: {}", config.enterprise_url),
        format!("GitHub API URL:        {}", config.api_url),
        format!("Access token:          {}", set_marker(config.has_token())),
        format!(
            "Trust custom certs:    {}",
            config.trust_custom_certificates
        ),
        format!("Webhook URL:           {}", config.webhook_url),
        format!(
            "Webhook secret:        {}",
            set_marker(config.has_webhook_secret())
        ),
        format!("Branch naming:         {}", config.branch_naming_template),
    ];

    lines.push("Repositories".bold().to_string());
    if config.mappings.is_empty() {
        lines.push("  (none)".to_string());
    }
    for mapping in &config.mappings {
        let repo = mapping.full_repo_name();
        let mut line = format!(
            "  {} -> {} ({})",
            mapping.project_key, repo, mapping.default_branch
        );
        if let Some(hook_id) = config.webhook_ids.get(&repo) {
            line.push_str(&format!(" webhook {}", hook_id));
        }
        lines.push(line);
    }

    lines.push("Transitions".bold().to_string());
    for event in TransitionEvent::ALL {
        let id = config.transition_mappings.get(event);
        if !id.is_empty() {
            lines.push(format!("  {} -> {}", event.as_str(), id));
        }
    }

    lines
}
