//! Read-through listing store over the metadata collection.

use std::sync::Arc;

use tracing::{debug, warn};

use docvault_cache::CacheManager;
use docvault_cache::keys;
use docvault_core::error::ErrorKind;
use docvault_core::result::AppResult;
use docvault_core::traits::cache::CacheProvider;
use docvault_core::types::NodeId;
use docvault_database::NodeRepository;
use docvault_entity::breadcrumb::Breadcrumb;
use docvault_entity::node::{KindFilter, Node, sort_listing};

use super::index::FolderIndex;

/// What a refresh re-fetched: the open folder's children and every folder.
#[derive(Debug, Clone, Default)]
pub struct FolderListing {
    /// Children of the refreshed folder, in listing order.
    pub children: Vec<Node>,
    /// Index over every folder.
    pub folders: FolderIndex,
}

/// Listing access with a TTL-bounded read-through cache.
///
/// The store never writes node data itself; mutations go through the
/// repository and then call [`NodeStore::refresh`].
#[derive(Debug, Clone)]
pub struct NodeStore {
    repo: Arc<dyn NodeRepository>,
    cache: Arc<CacheManager>,
}

impl NodeStore {
    /// Creates a new node store.
    pub fn new(repo: Arc<dyn NodeRepository>, cache: Arc<CacheManager>) -> Self {
        Self { repo, cache }
    }

    /// The underlying metadata collection.
    pub fn repository(&self) -> &Arc<dyn NodeRepository> {
        &self.repo
    }

    /// Children of `parent` (`None` = top level): folders first, then files,
    /// each group by case-insensitive name.
    pub async fn list_children(&self, parent: Option<NodeId>) -> AppResult<Vec<Node>> {
        let key = keys::children(parent);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let mut children = self
            .repo
            .list_by_parent(parent, KindFilter::Any)
            .await
            .map_err(|e| e.rekind(ErrorKind::Fetch))?;
        sort_listing(&mut children);

        self.store(&key, &children).await;
        Ok(children)
    }

    /// Every folder in the hierarchy.
    pub async fn list_all_folders(&self) -> AppResult<Vec<Node>> {
        let key = keys::all_folders();
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let mut folders = self
            .repo
            .list_all_folders()
            .await
            .map_err(|e| e.rekind(ErrorKind::Fetch))?;
        sort_listing(&mut folders);

        self.store(&key, &folders).await;
        Ok(folders)
    }

    /// Index over the current folder set.
    pub async fn folder_index(&self) -> AppResult<FolderIndex> {
        Ok(FolderIndex::from_folders(self.list_all_folders().await?))
    }

    /// Point lookup, uncached.
    pub async fn find(&self, id: NodeId) -> AppResult<Option<Node>> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| e.rekind(ErrorKind::Fetch))
    }

    /// Files directly inside `folder`, read straight from the collection.
    pub async fn files_in(&self, folder: NodeId) -> AppResult<Vec<Node>> {
        self.repo
            .list_by_parent(Some(folder), KindFilter::Files)
            .await
            .map_err(|e| e.rekind(ErrorKind::Fetch))
    }

    /// Breadcrumbs from the repository's batched ancestor query, for callers
    /// that hold no [`FolderIndex`].
    pub async fn breadcrumbs_uncached(&self, current: NodeId) -> AppResult<Vec<Breadcrumb>> {
        let chain = self
            .repo
            .find_ancestors(current)
            .await
            .map_err(|e| e.rekind(ErrorKind::Fetch))?;
        Ok(chain
            .iter()
            .filter(|n| n.is_folder)
            .map(Breadcrumb::from)
            .collect())
    }

    /// Drop every cached listing.
    pub async fn invalidate(&self) {
        match self.cache.delete_prefix(&keys::listing_prefix()).await {
            Ok(count) => debug!(count, "Listing cache invalidated"),
            Err(e) => warn!(error = %e, "Failed to invalidate listing cache"),
        }
    }

    /// Invalidate, then re-fetch the listing of `parent` and the folder set.
    pub async fn refresh(&self, parent: Option<NodeId>) -> AppResult<FolderListing> {
        self.invalidate().await;
        let children = self.list_children(parent).await?;
        let folders = self.folder_index().await?;
        Ok(FolderListing { children, folders })
    }

    /// Invalidate once, then re-fetch the listing of every folder in
    /// `parents` and the folder set.
    pub async fn refresh_listings(&self, parents: &[Option<NodeId>]) -> AppResult<()> {
        self.invalidate().await;
        let mut seen = Vec::with_capacity(parents.len());
        for &parent in parents {
            if !seen.contains(&parent) {
                seen.push(parent);
                self.list_children(parent).await?;
            }
        }
        self.list_all_folders().await?;
        Ok(())
    }

    async fn cached(&self, key: &str) -> Option<Vec<Node>> {
        match self.cache.get_json::<Vec<Node>>(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(key, error = %e, "Listing cache read failed");
                None
            }
        }
    }

    async fn store(&self, key: &str, nodes: &[Node]) {
        if let Err(e) = self.cache.set_json(key, &nodes).await {
            warn!(key, error = %e, "Listing cache write failed");
        }
    }
}
