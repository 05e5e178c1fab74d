//! Reminder delivery channels.
//!
//! - [`LogNotifier`]: writes the reminder to the log (no gateway configured)
//! - [`WebhookNotifier`]: POSTs `{phone, message}` to a messaging gateway

use std::time::Duration;

use async_trait::async_trait;
use fogon_db::{Notifier, NotifyError};
use serde::Serialize;
use tracing::info;

/// Logs reminders instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, phone: &str, message: &str) -> Result<(), NotifyError> {
        info!(phone = %phone, message = %message, "Reminder (log only)");
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    phone: &'a str,
    message: &'a str,
}

/// Sends reminders to an HTTP messaging gateway.
///
/// Any non-2xx answer counts as a failure, so the reservation stays
/// pending and the next pass retries it.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError(e.to_string()))?;
        Ok(WebhookNotifier { client, url: url.into() })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, phone: &str, message: &str) -> Result<(), NotifyError> {
        self.client
            .post(&self.url)
            .json(&WebhookPayload { phone, message })
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| NotifyError(e.to_string()))?;
        Ok(())
    }
}
