//! # View Collaborators
//!
//! The view talks to the user through two narrow capabilities:
//!
//! - [`Notifier`] - fire-and-forget toasts (severity, summary, detail)
//! - [`Confirmer`] - an accept/reject question, answered asynchronously
//!
//! Logging goes straight through `tracing`. Real front ends supply their own widget
//! bindings; [`TracingNotifier`] and [`StaticConfirmer`] cover headless use, and
//! [`crate::view::mock`] has recording doubles for tests.

use async_trait::async_trait;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Notification {
    pub fn new(severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn success(detail: impl Into<String>) -> Self {
        Self::new(Severity::Success, "Success", detail)
    }

    pub fn info(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Info, summary, detail)
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self::new(Severity::Error, "Error", detail)
    }
}

/// Shows notifications to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// The question put to the user before a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub message: String,
    pub header: String,
    pub icon: String,
}

impl ConfirmPrompt {
    pub fn delete_product() -> Self {
        Self {
            message: "Are you sure you want to delete this product?".to_string(),
            header: "Delete Confirmation".to_string(),
            icon: "pi pi-exclamation-triangle".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Rejected,
}

/// Asks the user to accept or reject an action.
///
/// The answer may take arbitrarily long; the view awaits it off its event loop.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, prompt: ConfirmPrompt) -> Confirmation;
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Success | Severity::Info => info!(summary = %n.summary, "{}", n.detail),
            Severity::Warn => warn!(summary = %n.summary, "{}", n.detail),
            Severity::Error => error!(summary = %n.summary, "{}", n.detail),
        }
    }
}

/// Gives the same answer to every prompt.
#[derive(Debug, Clone, Copy)]
pub struct StaticConfirmer(pub Confirmation);

#[async_trait]
impl Confirmer for StaticConfirmer {
    async fn confirm(&self, prompt: ConfirmPrompt) -> Confirmation {
        info!(header = %prompt.header, answer = ?self.0, "{}", prompt.message);
        self.0
    }
}
