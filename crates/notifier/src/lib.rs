//! Messaging-bot relay for Harborview lead and chat notifications.
//!
//! Lead-capture forms and live-chat messages are relayed to a staffed
//! messaging channel: each submission is formatted into a fixed
//! human-readable text block and delivered with a single POST to the bot
//! API. Replies typed into the channel come back through a webhook carrying
//! a `[session:<id>]` marker that routes them to the right chat session.
//!
//! # Example
//!
//! ```no_run
//! use notifier::{NotifyClient, NotifyConfig, QuoteRequest};
//!
//! # async fn example() -> Result<(), notifier::NotifyError> {
//! let client = NotifyClient::new(NotifyConfig {
//!     base_url: "https://bot.internal".to_string(),
//!     channel: "-100123456".to_string(),
//! })?;
//!
//! let quote = QuoteRequest {
//!     name: "Jane Fraser".to_string(),
//!     email: "jane@example.com".to_string(),
//!     phone: "+44 7700 900123".to_string(),
//!     loan_type: "bridging".to_string(),
//!     loan_amount: 250_000.0,
//!     message: None,
//! };
//! client.send_text(&quote.format()).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod format;

pub use client::NotifyClient;
pub use config::NotifyConfig;
pub use error::NotifyError;
pub use format::{
    chat_notification, parse_session_reply, ContactMessage, EligibilityCheck,
    QuoteRequest, ScheduleRequest, SessionReply,
};
