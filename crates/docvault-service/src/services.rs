//! Wiring of the service graph.

use std::sync::Arc;
use std::time::Duration;

use docvault_cache::CacheManager;
use docvault_core::config::AppConfig;
use docvault_core::traits::storage::StorageProvider;
use docvault_database::NodeRepository;

use crate::interaction::DropExecutor;
use crate::maintenance::OrphanSweeper;
use crate::node::NodeService;
use crate::store::NodeStore;
use crate::upload::UploadCoordinator;

/// Blobs younger than this are never treated as orphans.
const ORPHAN_MIN_AGE: Duration = Duration::from_secs(15 * 60);

/// Every service, sharing one store, cache and object store.
#[derive(Debug, Clone)]
pub struct Services {
    /// Cached listings.
    pub store: Arc<NodeStore>,
    /// Node mutations.
    pub nodes: Arc<NodeService>,
    /// Batch uploads.
    pub uploads: Arc<UploadCoordinator>,
    /// Drop handling.
    pub drops: DropExecutor,
    /// Orphan reconciliation.
    pub sweeper: OrphanSweeper,
}

impl Services {
    /// Build the service graph over the given collaborators.
    pub fn new(
        repo: Arc<dyn NodeRepository>,
        storage: Arc<dyn StorageProvider>,
        config: &AppConfig,
    ) -> Self {
        let cache = Arc::new(CacheManager::new(&config.cache));
        let store = Arc::new(NodeStore::new(repo.clone(), cache));
        let nodes = Arc::new(NodeService::new(
            store.clone(),
            storage.clone(),
            Duration::from_secs(config.storage.signing.default_ttl_seconds),
        ));
        let uploads = Arc::new(UploadCoordinator::new(
            store.clone(),
            storage.clone(),
            config.upload.clone(),
        ));
        let drops = DropExecutor::new(nodes.clone(), uploads.clone());
        let sweeper = OrphanSweeper::new(repo, storage, ORPHAN_MIN_AGE);

        Self {
            store,
            nodes,
            uploads,
            drops,
            sweeper,
        }
    }
}
