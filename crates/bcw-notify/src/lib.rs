//! Outbound chat notifications.
//!
//! Tasks build a [`Notification`] and hand it to a [`Notifier`]. Delivery is
//! best-effort: callers go through [`notify_best_effort`], which logs a
//! failed send and never reports it back.

pub mod discord;
pub mod message;

use async_trait::async_trait;
use thiserror::Error;

pub use discord::DiscordWebhook;
pub use message::{Field, Notification, COLOR_BRAND, COLOR_NOT_FOUND, COLOR_VERIFIED};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Anything that can deliver a [`Notification`].
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the message could not be delivered.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier used when no webhook is configured. Accepts and drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::debug!(title = %notification.title, "notify: no webhook configured; dropped");
        Ok(())
    }
}

/// Send `notification` and swallow any failure after logging it.
///
/// Returns whether delivery succeeded so callers may count it; task outcomes
/// must not depend on the value.
pub async fn notify_best_effort(notifier: &dyn Notifier, notification: &Notification) -> bool {
    match notifier.send(notification).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                title = %notification.title,
                error = %e,
                "notify: delivery failed; continuing"
            );
            false
        }
    }
}
