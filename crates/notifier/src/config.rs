//! Configuration for the bot relay.

/// Configuration for connecting to the messaging-bot API.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Base URL of the bot API (token included by the deployment,
    /// e.g. "https://bot.example/bot<token>").
    pub base_url: String,
    /// Channel or chat identifier notifications are delivered to.
    pub channel: String,
}

impl NotifyConfig {
    /// Create a new configuration.
    pub fn new(base_url: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            channel: channel.into(),
        }
    }

    /// Get the sendMessage endpoint URL.
    pub fn send_url(&self) -> String {
        format!("{}/sendMessage", self.base_url.trim_end_matches('/'))
    }
}
