//! Storage error types.

use thiserror::Error;

/// Errors that can occur against an object storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the bucket gateway.
    #[error("storage gateway returned {code}: {body}")]
    Status { code: u16, body: String },

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key failed validation (empty, absolute, or traversing).
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// No object under the requested key.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Primary and secondary backends both failed.
    #[error("both storage backends failed (primary: {primary}; secondary: {secondary})")]
    BothFailed {
        primary: Box<StorageError>,
        secondary: Box<StorageError>,
    },
}
