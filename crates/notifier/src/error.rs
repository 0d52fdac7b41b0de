//! Error types for the notify relay.

use thiserror::Error;

/// Errors that can occur when relaying a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the bot API.
    #[error("bot API returned {code}: {body}")]
    Status { code: u16, body: String },

    /// Bot API accepted the request but reported a delivery failure.
    #[error("bot API rejected message: {0}")]
    Rejected(String),
}
