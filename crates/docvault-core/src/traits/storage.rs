//! Object store trait for pluggable blob backends.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// A blob that could not be removed during a bulk removal.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemovalFailure {
    /// Storage key of the blob.
    pub key: String,
    /// Why the removal failed.
    pub reason: String,
}

/// Per-key outcome of [`StorageProvider::remove_objects`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemovalReport {
    /// Keys that were removed (or were already absent).
    pub removed: Vec<String>,
    /// Keys that could not be removed.
    pub failed: Vec<RemovalFailure>,
}

impl RemovalReport {
    /// Whether every requested key was removed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Build a report in which every key failed for the same reason.
    pub fn all_failed(keys: &[String], reason: &str) -> Self {
        Self {
            removed: Vec::new(),
            failed: keys
                .iter()
                .map(|key| RemovalFailure {
                    key: key.clone(),
                    reason: reason.to_string(),
                })
                .collect(),
        }
    }
}

/// Trait for blob storage backends.
///
/// Keys are opaque locators produced by the upload path; providers never
/// interpret them beyond mapping them onto their own namespace. Timeouts
/// and retries, if any, belong to the provider's transport.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write a blob under `key`, replacing any previous content.
    async fn put_object(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read a whole blob into memory.
    async fn get_object(&self, key: &str) -> AppResult<Bytes>;

    /// Check whether a blob exists under `key`.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Mint a URL that grants read access to `key` for `ttl`.
    async fn temporary_read_url(&self, key: &str, ttl: Duration) -> AppResult<String>;

    /// Remove several blobs, reporting the outcome per key. An `Err`
    /// means the provider could not be reached at all.
    async fn remove_objects(&self, keys: &[String]) -> AppResult<RemovalReport>;

    /// List every key currently held by the provider.
    async fn list_keys(&self) -> AppResult<Vec<String>>;
}
