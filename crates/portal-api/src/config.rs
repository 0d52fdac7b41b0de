//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use storage::HttpStoreConfig;

/// Portal API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Primary bucket gateway, if configured.
    pub storage_gateway: Option<HttpStoreConfig>,
    /// Directory for the secondary (spool) store.
    pub storage_fallback_dir: String,
    /// Messaging-bot API base URL.
    pub bot_api_url: String,
    /// Channel notifications are delivered to.
    pub bot_channel: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `PORTAL_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:portal.db?mode=rwc` |
    /// | `STORAGE_GATEWAY_URL` | Bucket gateway base URL | (optional) |
    /// | `STORAGE_BUCKET` | Bucket name | `loan-documents` |
    /// | `STORAGE_TOKEN` | Gateway service token | (required with gateway) |
    /// | `STORAGE_FALLBACK_DIR` | Spool directory | `storage-spool` |
    /// | `BOT_API_URL` | Messaging-bot API base URL | (required) |
    /// | `BOT_CHANNEL` | Notification channel ID | (required) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("PORTAL_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:portal.db?mode=rwc".to_string());

        let storage_gateway = match env::var("STORAGE_GATEWAY_URL") {
            Ok(base_url) => {
                let bucket = env::var("STORAGE_BUCKET")
                    .unwrap_or_else(|_| "loan-documents".to_string());
                let token =
                    env::var("STORAGE_TOKEN").map_err(|_| ConfigError::MissingStorageToken)?;
                Some(HttpStoreConfig {
                    base_url,
                    bucket,
                    token,
                })
            }
            Err(_) => None,
        };

        let storage_fallback_dir =
            env::var("STORAGE_FALLBACK_DIR").unwrap_or_else(|_| "storage-spool".to_string());

        let bot_api_url = env::var("BOT_API_URL").map_err(|_| ConfigError::MissingBotApiUrl)?;
        let bot_channel = env::var("BOT_CHANNEL").map_err(|_| ConfigError::MissingBotChannel)?;

        Ok(Self {
            addr,
            database_url,
            storage_gateway,
            storage_fallback_dir,
            bot_api_url,
            bot_channel,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORTAL_ADDR format")]
    InvalidAddr,

    #[error("STORAGE_TOKEN is required when STORAGE_GATEWAY_URL is set")]
    MissingStorageToken,

    #[error("BOT_API_URL environment variable is required")]
    MissingBotApiUrl,

    #[error("BOT_CHANNEL environment variable is required")]
    MissingBotChannel,
}
