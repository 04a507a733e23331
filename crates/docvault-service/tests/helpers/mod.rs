//! Shared fixtures for the service integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::storage::{RemovalFailure, RemovalReport, StorageProvider};
use docvault_core::types::NodeId;
use docvault_database::{MemoryNodeRepository, NodeRepository};
use docvault_entity::node::{CreateNode, FlagCategory, KindFilter, Node, NodePatch};
use docvault_service::Services;
use docvault_storage::providers::MemoryStorageProvider;

/// Object store that fails on demand.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorageProvider,
    /// Blob writes fail for files whose key ends with one of these names.
    pub fail_put_for: Mutex<HashSet<String>>,
    /// Removals fail for these exact keys.
    pub fail_remove_for: Mutex<HashSet<String>>,
    /// Every removal call fails outright.
    pub unreachable: AtomicBool,
}

impl FlakyStorage {
    pub fn fail_put(&self, file_name: &str) {
        self.fail_put_for.lock().unwrap().insert(file_name.to_string());
    }

    pub fn allow_put(&self, file_name: &str) {
        self.fail_put_for.lock().unwrap().remove(file_name);
    }

    pub fn set_unreachable(&self, down: bool) {
        self.unreachable.store(down, Ordering::SeqCst);
    }

    pub fn fail_remove(&self, key: &str) {
        self.fail_remove_for.lock().unwrap().insert(key.to_string());
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.list_keys().await.unwrap()
    }
}

#[async_trait]
impl StorageProvider for FlakyStorage {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put_object(&self, key: &str, data: Bytes) -> AppResult<()> {
        let refused = self
            .fail_put_for
            .lock()
            .unwrap()
            .iter()
            .any(|name| key.ends_with(&format!("-{name}")));
        if refused {
            return Err(AppError::storage(format!("disk full writing {key}")));
        }
        self.inner.put_object(key, data).await
    }

    async fn get_object(&self, key: &str) -> AppResult<Bytes> {
        self.inner.get_object(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn temporary_read_url(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.inner.temporary_read_url(key, ttl).await
    }

    async fn remove_objects(&self, keys: &[String]) -> AppResult<RemovalReport> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AppError::storage("object store unreachable"));
        }
        let refused = self.fail_remove_for.lock().unwrap().clone();
        let (bad, good): (Vec<String>, Vec<String>) =
            keys.iter().cloned().partition(|k| refused.contains(k));

        let mut report = self.inner.remove_objects(&good).await?;
        report.failed = bad
            .into_iter()
            .map(|key| RemovalFailure {
                key,
                reason: "permission denied".to_string(),
            })
            .collect();
        Ok(report)
    }

    async fn list_keys(&self) -> AppResult<Vec<String>> {
        self.inner.list_keys().await
    }
}

/// Repository whose inserts fail for chosen file names and whose listings
/// can be switched off.
#[derive(Debug, Default)]
pub struct FlakyRepository {
    pub inner: MemoryNodeRepository,
    pub fail_insert_for: Mutex<HashSet<String>>,
    pub fail_listings: AtomicBool,
}

impl FlakyRepository {
    pub fn set_listings_failing(&self, failing: bool) {
        self.fail_listings.store(failing, Ordering::SeqCst);
    }

    fn check_listing(&self) -> AppResult<()> {
        if self.fail_listings.load(Ordering::SeqCst) {
            return Err(AppError::database("statement timeout"));
        }
        Ok(())
    }
}

#[async_trait]
impl NodeRepository for FlakyRepository {
    async fn list_by_parent(&self, parent: Option<NodeId>, kind: KindFilter) -> AppResult<Vec<Node>> {
        self.check_listing()?;
        self.inner.list_by_parent(parent, kind).await
    }

    async fn list_all_folders(&self) -> AppResult<Vec<Node>> {
        self.check_listing()?;
        self.inner.list_all_folders().await
    }

    async fn find_by_id(&self, id: NodeId) -> AppResult<Option<Node>> {
        self.inner.find_by_id(id).await
    }

    async fn find_ancestors(&self, id: NodeId) -> AppResult<Vec<Node>> {
        self.inner.find_ancestors(id).await
    }

    async fn insert(&self, data: &CreateNode) -> AppResult<Node> {
        if self.fail_insert_for.lock().unwrap().contains(&data.name) {
            return Err(AppError::database("connection reset by peer"));
        }
        self.inner.insert(data).await
    }

    async fn update(&self, id: NodeId, patch: &NodePatch) -> AppResult<Node> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, ids: &[NodeId]) -> AppResult<u64> {
        self.inner.delete(ids).await
    }

    async fn clear_flag(&self, flag: FlagCategory) -> AppResult<u64> {
        self.inner.clear_flag(flag).await
    }

    async fn set_flag(&self, id: NodeId, flag: FlagCategory) -> AppResult<Node> {
        self.inner.set_flag(id, flag).await
    }

    async fn list_storage_keys(&self) -> AppResult<Vec<String>> {
        self.inner.list_storage_keys().await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Fully wired services over flaky collaborators.
pub struct TestApp {
    pub repo: Arc<FlakyRepository>,
    pub storage: Arc<FlakyStorage>,
    pub services: Services,
}

impl TestApp {
    pub fn new(nodes: Vec<Node>) -> Self {
        let repo = Arc::new(FlakyRepository {
            inner: MemoryNodeRepository::with_nodes(nodes),
            ..FlakyRepository::default()
        });
        let storage = Arc::new(FlakyStorage::default());
        let services = Services::new(repo.clone(), storage.clone(), &AppConfig::default());
        Self {
            repo,
            storage,
            services,
        }
    }

    pub async fn node(&self, id: NodeId) -> Option<Node> {
        self.repo.inner.find_by_id(id).await.unwrap()
    }
}
