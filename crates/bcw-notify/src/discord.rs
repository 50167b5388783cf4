//! Discord-compatible incoming webhook sender.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;

use crate::message::{Field, Notification};
use crate::{Notifier, NotifyError};

const FOOTER_TEXT: &str = "BrandConnect worker";

#[derive(Serialize)]
struct WebhookPayload<'a> {
    embeds: [Embed<'a>; 1],
}

#[derive(Serialize)]
struct Embed<'a> {
    title: &'a str,
    description: &'a str,
    color: u32,
    fields: &'a [Field],
    timestamp: String,
    footer: Footer,
}

#[derive(Serialize)]
struct Footer {
    text: &'static str,
}

/// Posts each notification as a single embed to a webhook URL.
#[derive(Clone)]
pub struct DiscordWebhook {
    client: Client,
    url: String,
}

impl std::fmt::Debug for DiscordWebhook {
    // The URL path embeds the webhook token.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordWebhook")
            .field("url", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl DiscordWebhook {
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("bcw-worker/0.1")
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    fn payload(notification: &Notification) -> WebhookPayload<'_> {
        WebhookPayload {
            embeds: [Embed {
                title: &notification.title,
                description: &notification.description,
                color: notification.color,
                fields: &notification.fields,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                footer: Footer { text: FOOTER_TEXT },
            }],
        }
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(notification))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(title = %notification.title, "notify: webhook delivered");
        Ok(())
    }
}
