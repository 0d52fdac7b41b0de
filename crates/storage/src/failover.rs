//! Primary/secondary store composition with a single logged fallback.

use tracing::warn;

use crate::error::StorageError;
use crate::{ObjectStore, StoredObject};

/// An object store that tries a primary backend and falls back once to a
/// secondary.
///
/// The fallback is a recorded decision: every primary failure is logged at
/// warn with the error before the secondary is attempted, and if both fail
/// the returned error carries both causes.
pub struct FailoverStore {
    primary: Box<dyn ObjectStore>,
    secondary: Box<dyn ObjectStore>,
}

impl FailoverStore {
    /// Compose a primary and a secondary backend.
    pub fn new(primary: Box<dyn ObjectStore>, secondary: Box<dyn ObjectStore>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait::async_trait]
impl ObjectStore for FailoverStore {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let primary_err = match self.primary.put(key, bytes, content_type).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        warn!(
            key = %key,
            primary = self.primary.name(),
            secondary = self.secondary.name(),
            error = %primary_err,
            "Primary store write failed, falling back"
        );

        self.secondary
            .put(key, bytes, content_type)
            .await
            .map_err(|secondary_err| StorageError::BothFailed {
                primary: Box::new(primary_err),
                secondary: Box::new(secondary_err),
            })
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        let primary_err = match self.primary.get(key).await {
            Ok(object) => return Ok(object),
            Err(e) => e,
        };

        warn!(
            key = %key,
            primary = self.primary.name(),
            secondary = self.secondary.name(),
            error = %primary_err,
            "Primary store read failed, falling back"
        );

        self.secondary
            .get(key)
            .await
            .map_err(|secondary_err| StorageError::BothFailed {
                primary: Box::new(primary_err),
                secondary: Box::new(secondary_err),
            })
    }

    fn name(&self) -> &'static str {
        "failover"
    }
}
