//! In-process object store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::storage::{RemovalReport, StorageProvider};

use crate::signing::UrlSigner;

/// Blob store kept in a map; contents vanish with the process.
#[derive(Debug, Clone)]
pub struct MemoryStorageProvider {
    blobs: Arc<RwLock<BTreeMap<String, Bytes>>>,
    signer: UrlSigner,
}

impl MemoryStorageProvider {
    /// Create an empty store.
    pub fn new(signer: UrlSigner) -> Self {
        Self {
            blobs: Arc::new(RwLock::new(BTreeMap::new())),
            signer,
        }
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

impl Default for MemoryStorageProvider {
    fn default() -> Self {
        Self::new(UrlSigner::new(&Default::default()))
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put_object(&self, key: &str, data: Bytes) -> AppResult<()> {
        if key.is_empty() {
            return Err(AppError::validation("Storage key must not be empty"));
        }
        self.blobs.write().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> AppResult<Bytes> {
        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {key}")))
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.blobs.read().await.contains_key(key))
    }

    async fn temporary_read_url(&self, key: &str, ttl: Duration) -> AppResult<String> {
        if !self.exists(key).await? {
            return Err(AppError::not_found(format!("Blob not found: {key}")));
        }
        self.signer.sign(key, ttl)
    }

    async fn remove_objects(&self, keys: &[String]) -> AppResult<RemovalReport> {
        let mut blobs = self.blobs.write().await;
        for key in keys {
            blobs.remove(key);
        }
        Ok(RemovalReport {
            removed: keys.to_vec(),
            failed: Vec::new(),
        })
    }

    async fn list_keys(&self) -> AppResult<Vec<String>> {
        Ok(self.blobs.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_and_listing() {
        let store = MemoryStorageProvider::default();
        store.put_object("k2", Bytes::from("2")).await.unwrap();
        store.put_object("k1", Bytes::from("1")).await.unwrap();

        assert_eq!(store.get_object("k1").await.unwrap(), Bytes::from("1"));
        assert_eq!(store.list_keys().await.unwrap(), ["k1", "k2"]);

        store.remove_objects(&["k1".to_string()]).await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
