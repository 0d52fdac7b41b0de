//! Filesystem object store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;
use crate::key::validate_key;
use crate::{ObjectStore, StoredObject};

/// Object store backed by a local directory.
///
/// Keys map onto relative paths under the root; the content type is kept in
/// a `.ctype` sidecar next to the object.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn sidecar_path(path: &Path) -> PathBuf {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(".ctype");
        PathBuf::from(sidecar)
    }
}

#[async_trait::async_trait]
impl ObjectStore for FsStore {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let path = self.object_path(key)?;
        debug!(path = %path.display(), size = bytes.len(), "write object");

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        tokio::fs::write(Self::sidecar_path(&path), content_type).await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        let path = self.object_path(key)?;
        debug!(path = %path.display(), "read object");

        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        let content_type = match tokio::fs::read_to_string(Self::sidecar_path(&path)).await {
            Ok(ct) => ct,
            Err(e) if e.kind() == ErrorKind::NotFound => "application/octet-stream".to_string(),
            Err(e) => return Err(StorageError::Io(e)),
        };

        Ok(StoredObject {
            bytes,
            content_type,
        })
    }

    fn name(&self) -> &'static str {
        "fs"
    }
}
