//! Object storage backends for the Harborview portal.
//!
//! Uploaded documents are persisted through the [`ObjectStore`] trait. Two
//! backends are provided: [`HttpStore`] talks to an S3-compatible bucket
//! gateway over REST, and [`FsStore`] writes to a local directory. A
//! [`FailoverStore`] composes a primary and a secondary: the primary is
//! tried first, and a failure is logged and retried once against the
//! secondary.
//!
//! # Example
//!
//! ```no_run
//! use storage::{FailoverStore, FsStore, HttpStore, HttpStoreConfig, ObjectStore};
//!
//! # async fn example() -> Result<(), storage::StorageError> {
//! let primary = HttpStore::new(HttpStoreConfig {
//!     base_url: "https://storage.internal".to_string(),
//!     bucket: "loan-documents".to_string(),
//!     token: "service-token".to_string(),
//! })?;
//! let secondary = FsStore::new("/var/spool/harborview");
//! let store = FailoverStore::new(Box::new(primary), Box::new(secondary));
//!
//! store.put("documents/abc/proof-1.pdf", b"%PDF-", "application/pdf").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod failover;
pub mod fs;
pub mod http;
pub mod key;

pub use error::StorageError;
pub use failover::FailoverStore;
pub use fs::FsStore;
pub use http::{HttpStore, HttpStoreConfig};
pub use key::{document_key, sanitize_filename, validate_key};

use async_trait::async_trait;

/// An object read back from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// A key-addressed blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object under the given key, overwriting any previous value.
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str)
        -> Result<(), StorageError>;

    /// Read an object back by key.
    async fn get(&self, key: &str) -> Result<StoredObject, StorageError>;

    /// Short backend name, used when logging failover decisions.
    fn name(&self) -> &'static str;
}
