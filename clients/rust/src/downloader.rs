//! Off-chain JSON metadata resolution.
//!
//! A metadata URI is an optional enrichment source: fetch failures never
//! affect on-chain correctness. Find operations degrade to an absent
//! document; only the explicit load operation treats failures as errors.

use async_trait::async_trait;

use crate::errors::{ClientError, ClientResult};
use crate::types::JsonMetadata;

/// External collaborator resolving a URI to a JSON document.
#[async_trait]
pub trait MetadataDownloader: Send + Sync {
    async fn download(&self, uri: &str) -> ClientResult<JsonMetadata>;
}

/// HTTP downloader over `reqwest`.
pub struct HttpDownloader {
    http: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Reuse an existing HTTP client (connection pooling).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataDownloader for HttpDownloader {
    async fn download(&self, uri: &str) -> ClientResult<JsonMetadata> {
        let response = self
            .http
            .get(uri)
            .send()
            .await
            .map_err(|e| ClientError::MetadataDownload {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        let response = response
            .error_for_status()
            .map_err(|e| ClientError::MetadataDownload {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        response
            .json::<JsonMetadata>()
            .await
            .map_err(|e| ClientError::MetadataDownload {
                uri: uri.to_string(),
                message: e.to_string(),
            })
    }
}
