//! The host platform the controllers render into.
//!
//! The issue tracker provides transient notifications, modal dialogs, a page
//! reload, and the page elements themselves. Controllers never touch those
//! directly; they describe what should be shown through [`Host`].

use link_core::{PanelView, Status};

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient, auto-dismissing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub body: String,

    /// Link attached to the body, e.g. a created pull request.
    pub link: Option<String>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: &str, body: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            body: body.into(),
            link: None,
        }
    }

    pub fn success(title: &str, body: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, body)
    }

    pub fn error(title: &str, body: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, body)
    }

    pub fn warning(title: &str, body: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, title, body)
    }

    pub fn info(title: &str, body: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, body)
    }

    /// Attaches a link to the notification body.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Modal dialogs of the issue panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialog {
    CreateBranch,
    CreatePullRequest,
}

/// Controls that trigger an orchestrated action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    SaveConfig,
    TestConnection,
    GenerateSecret,
    RegisterWebhooks,
    CreateBranch,
    CreatePullRequest,
}

/// Inline status regions, one per form or section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusRegion {
    SaveConfig,
    TestConnection,
    RegisterWebhooks,
    BranchDialog,
    PullRequestDialog,
}

/// Rendering surface and platform services.
///
/// Implementations are called from controller code only; they must not call
/// back into a controller.
pub trait Host: Send + Sync {
    /// Shows a transient notification.
    fn notify(&self, notification: Notification);

    fn show_dialog(&self, dialog: Dialog);

    fn hide_dialog(&self, dialog: Dialog);

    /// Reloads the whole page, discarding page-local state.
    fn reload_page(&self);

    /// Enables or disables a control. A disabled control is also marked
    /// non-interactive for assistive technology.
    fn set_control_enabled(&self, control: Control, enabled: bool);

    /// Replaces the text of an inline status region.
    fn set_status(&self, region: StatusRegion, status: &Status);

    /// Replaces the issue panel contents.
    fn render_panel(&self, view: &PanelView);
}
