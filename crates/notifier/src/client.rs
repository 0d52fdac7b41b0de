//! Bot API HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::NotifyConfig;
use crate::error::NotifyError;

/// sendMessage request body.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct BotResponse {
    ok: bool,
    description: Option<String>,
}

/// Client for delivering notifications to the messaging-bot API.
#[derive(Debug, Clone)]
pub struct NotifyClient {
    http: Client,
    config: NotifyConfig,
}

impl NotifyClient {
    /// Request timeout for bot API calls.
    const TIMEOUT: Duration = Duration::from_secs(15);

    /// Create a client for the configured bot endpoint.
    pub fn new(config: NotifyConfig) -> Result<Self, NotifyError> {
        let http = Client::builder().timeout(Self::TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    /// Deliver a text block to the configured channel.
    pub async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        let url = self.config.send_url();
        debug!(url = %url, chars = text.len(), "Relaying notification");

        let response = self
            .http
            .post(&url)
            .json(&SendMessageRequest {
                chat_id: &self.config.channel,
                text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let bot: BotResponse = response.json().await?;
        if !bot.ok {
            return Err(NotifyError::Rejected(
                bot.description.unwrap_or_else(|| "no description".to_string()),
            ));
        }

        info!(channel = %self.config.channel, "Notification relayed");
        Ok(())
    }

    /// Get the configuration.
    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }
}
