//! HTTP bucket-gateway object store.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::StorageError;
use crate::key::validate_key;
use crate::{ObjectStore, StoredObject};

/// Configuration for an S3-compatible bucket gateway.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Base URL of the gateway (e.g., "https://storage.internal").
    pub base_url: String,
    /// Bucket name all keys are scoped under.
    pub bucket: String,
    /// Service token sent as a bearer credential.
    pub token: String,
}

impl HttpStoreConfig {
    /// URL for an object, with each key segment percent-encoded.
    pub fn object_url(&self, key: &str) -> String {
        let encoded: Vec<_> = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!(
            "{}/object/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            encoded.join("/")
        )
    }
}

/// Object store backed by an HTTP bucket gateway.
#[derive(Debug, Clone)]
pub struct HttpStore {
    http: Client,
    config: HttpStoreConfig,
}

impl HttpStore {
    /// Request timeout for gateway calls.
    const TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a store for the configured gateway and bucket.
    pub fn new(config: HttpStoreConfig) -> Result<Self, StorageError> {
        let http = Client::builder().timeout(Self::TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl ObjectStore for HttpStore {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        validate_key(key)?;
        let url = self.config.object_url(key);
        debug!(url = %url, size = bytes.len(), "PUT object");

        let response = self
            .http
            .put(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .header(CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                code: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        validate_key(key)?;
        let url = self.config.object_url(key);
        debug!(url = %url, "GET object");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(key.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(StoredObject {
            bytes,
            content_type,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_encodes_segments() {
        let config = HttpStoreConfig {
            base_url: "https://storage.internal/".to_string(),
            bucket: "loan-documents".to_string(),
            token: "t".to_string(),
        };
        assert_eq!(
            config.object_url("documents/loan 1/a b.pdf"),
            "https://storage.internal/object/loan-documents/documents/loan%201/a%20b.pdf"
        );
    }
}
