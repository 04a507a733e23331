//! Node mutations: create, rename, move, delete, flag, download.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};
use validator::Validate;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::storage::{RemovalReport, StorageProvider};
use docvault_core::types::NodeId;
use docvault_entity::node::{CreateNode, FlagCategory, Node, NodePatch};

use crate::store::NodeStore;
use crate::tree::validate_move;

use super::report::{DeleteReport, MoveOutcome, PartialDeleteWarning};

/// A display name as submitted by the caller.
#[derive(Debug, Clone, Validate)]
struct NodeName {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    name: String,
}

impl NodeName {
    fn parse(raw: &str) -> AppResult<String> {
        let candidate = Self {
            name: raw.trim().to_string(),
        };
        candidate.validate()?;
        Ok(candidate.name)
    }
}

/// Orchestrates node mutations against the metadata collection and the
/// object store. Every successful mutation refreshes the affected listings
/// before returning.
#[derive(Debug, Clone)]
pub struct NodeService {
    store: Arc<NodeStore>,
    storage: Arc<dyn StorageProvider>,
    default_url_ttl: Duration,
}

impl NodeService {
    /// Creates a new node service.
    pub fn new(
        store: Arc<NodeStore>,
        storage: Arc<dyn StorageProvider>,
        default_url_ttl: Duration,
    ) -> Self {
        Self {
            store,
            storage,
            default_url_ttl,
        }
    }

    /// The listing store this service refreshes.
    pub fn store(&self) -> &Arc<NodeStore> {
        &self.store
    }

    /// Create an empty folder under `parent` (`None` = top level).
    pub async fn create_folder(&self, parent: Option<NodeId>, name: &str) -> AppResult<Node> {
        let name = NodeName::parse(name)?;
        if let Some(parent_id) = parent {
            self.require_folder(parent_id).await?;
        }

        let folder = self
            .store
            .repository()
            .insert(&CreateNode::folder(name, parent))
            .await?;

        info!(folder_id = %folder.id, name = %folder.name, "Folder created");
        self.refresh_after(&[parent]).await;
        Ok(folder)
    }

    /// Change a node's display name.
    pub async fn rename(&self, id: NodeId, name: &str) -> AppResult<Node> {
        let name = NodeName::parse(name)?;
        let node = self.require_node(id).await?;

        let updated = self
            .store
            .repository()
            .update(id, &NodePatch::rename(name))
            .await?;

        info!(node_id = %id, from = %node.name, to = %updated.name, "Node renamed");
        self.refresh_after(&[updated.parent_id]).await;
        Ok(updated)
    }

    /// Relocate a node under `target` after running the move validator.
    pub async fn move_node(&self, id: NodeId, target: Option<NodeId>) -> AppResult<MoveOutcome> {
        let node = self.require_node(id).await?;
        let folders = self.store.folder_index().await?;

        if let Err(reason) = validate_move(&node, target, &folders) {
            info!(node_id = %id, target = ?target, %reason, "Move rejected");
            return Ok(MoveOutcome::Rejected { reason });
        }

        let moved = self
            .store
            .repository()
            .update(id, &NodePatch::move_to(target))
            .await?;

        info!(node_id = %id, from = ?node.parent_id, to = ?target, "Node moved");
        self.refresh_after(&[node.parent_id, target]).await;
        Ok(MoveOutcome::Moved { node: moved })
    }

    /// Delete nodes. Folders cascade to every descendant folder and file.
    ///
    /// Blobs are removed first on a best-effort basis; records are removed
    /// regardless and blob failures come back as warnings.
    pub async fn delete(&self, ids: &[NodeId]) -> AppResult<DeleteReport> {
        let mut report = DeleteReport::default();
        let mut doomed: Vec<Node> = Vec::new();
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut refresh_parents: BTreeSet<Option<NodeId>> = BTreeSet::new();
        let folders = self.store.folder_index().await?;

        for &id in ids {
            if seen.contains(&id) {
                continue;
            }
            let Some(node) = self.store.find(id).await? else {
                report.missing.push(id);
                continue;
            };
            refresh_parents.insert(node.parent_id);

            if node.is_folder {
                let mut subtree = vec![id];
                subtree.extend(folders.descendants_of(id));
                for folder_id in subtree {
                    if !seen.insert(folder_id) {
                        continue;
                    }
                    for file in self.store.files_in(folder_id).await? {
                        if seen.insert(file.id) {
                            doomed.push(file);
                        }
                    }
                    if let Some(folder) = folders.get(folder_id) {
                        doomed.push(folder.clone());
                    } else if folder_id == id {
                        doomed.push(node.clone());
                    }
                }
            } else {
                seen.insert(id);
                doomed.push(node);
            }
        }

        if doomed.is_empty() {
            return Ok(report);
        }

        let keys: Vec<String> = doomed
            .iter()
            .filter(|n| !n.is_folder)
            .filter_map(|n| n.storage_key.clone())
            .collect();
        if !keys.is_empty() {
            let removal = match self.storage.remove_objects(&keys).await {
                Ok(removal) => removal,
                Err(e) => RemovalReport::all_failed(&keys, &e.message),
            };
            for failure in removal.failed {
                warn!(storage_key = %failure.key, reason = %failure.reason, "Blob left behind by delete");
                report.warnings.push(PartialDeleteWarning {
                    storage_key: failure.key,
                    reason: failure.reason,
                });
            }
        }

        let doomed_ids: Vec<NodeId> = doomed.iter().map(|n| n.id).collect();
        report.deleted = self.store.repository().delete(&doomed_ids).await?;

        info!(
            requested = ids.len(),
            deleted = report.deleted,
            warnings = report.warnings.len(),
            "Nodes deleted"
        );
        let parents: Vec<Option<NodeId>> = refresh_parents.into_iter().collect();
        self.refresh_after(&parents).await;
        Ok(report)
    }

    /// Make `id` the single holder of `flag`.
    pub async fn assign_flag(&self, id: NodeId, flag: FlagCategory) -> AppResult<Node> {
        let node = self.require_node(id).await?;
        if node.is_folder {
            return Err(AppError::validation(format!(
                "Only files can be marked as the current {flag}"
            )));
        }

        let repo = self.store.repository();
        let cleared = repo.clear_flag(flag).await.map_err(|e| {
            AppError::with_source(ErrorKind::Conflict, format!("Failed to clear {flag}"), e)
        })?;
        let flagged = repo.set_flag(id, flag).await.map_err(|e| {
            AppError::with_source(ErrorKind::Conflict, format!("Failed to assign {flag}"), e)
        })?;

        info!(node_id = %id, %flag, cleared, "Flag assigned");
        self.refresh_after(&[flagged.parent_id]).await;
        Ok(flagged)
    }

    /// Fetch a file together with its content.
    pub async fn download(&self, id: NodeId) -> AppResult<(Node, Bytes)> {
        let (node, key) = self.require_file_blob(id).await?;
        let data = self.storage.get_object(&key).await?;
        Ok((node, data))
    }

    /// Mint a time-limited read URL for a file.
    pub async fn temporary_url(&self, id: NodeId, ttl: Option<Duration>) -> AppResult<String> {
        let (_, key) = self.require_file_blob(id).await?;
        self.storage
            .temporary_read_url(&key, ttl.unwrap_or(self.default_url_ttl))
            .await
    }

    async fn require_node(&self, id: NodeId) -> AppResult<Node> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Node {id} not found")))
    }

    async fn require_folder(&self, id: NodeId) -> AppResult<Node> {
        let node = self.require_node(id).await?;
        if !node.is_folder {
            return Err(AppError::validation(format!("{} is not a folder", node.name)));
        }
        Ok(node)
    }

    async fn require_file_blob(&self, id: NodeId) -> AppResult<(Node, String)> {
        let node = self.require_node(id).await?;
        if node.is_folder {
            return Err(AppError::validation(format!("{} is a folder", node.name)));
        }
        let key = node
            .storage_key
            .clone()
            .ok_or_else(|| AppError::not_found(format!("{} has no stored content", node.name)))?;
        Ok((node, key))
    }

    /// Re-fetch listings after a mutation. The mutation already happened, so
    /// a failed re-fetch is logged rather than returned.
    async fn refresh_after(&self, parents: &[Option<NodeId>]) {
        if let Err(e) = self.store.refresh_listings(parents).await {
            warn!(parents = ?parents, error = %e, "Listing refresh after mutation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use docvault_cache::CacheManager;
    use docvault_core::config::CacheConfig;
    use docvault_database::{MemoryNodeRepository, NodeRepository};
    use docvault_storage::providers::MemoryStorageProvider;

    use super::*;
    use crate::tree::MoveRejection;

    struct Fixture {
        repo: MemoryNodeRepository,
        storage: Arc<MemoryStorageProvider>,
        service: NodeService,
    }

    fn fixture(nodes: Vec<Node>) -> Fixture {
        let repo = MemoryNodeRepository::with_nodes(nodes);
        let storage = Arc::new(MemoryStorageProvider::default());
        let store = Arc::new(NodeStore::new(
            Arc::new(repo.clone()),
            Arc::new(CacheManager::new(&CacheConfig::default())),
        ));
        let service = NodeService::new(store, storage.clone(), Duration::from_secs(60));
        Fixture {
            repo,
            storage,
            service,
        }
    }

    #[tokio::test]
    async fn test_create_folder_validates_name_and_parent() {
        let file = Node::file("a.txt", None, "k", 1);
        let fx = fixture(vec![file.clone()]);

        let err = fx.service.create_folder(None, "   ").await.unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let err = fx
            .service
            .create_folder(Some(file.id), "Inside a file")
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let folder = fx.service.create_folder(None, "  Projects ").await.unwrap();
        assert_eq!(folder.name, "Projects");
        assert!(folder.is_folder);
    }

    #[tokio::test]
    async fn test_created_folder_visible_in_listing() {
        let fx = fixture(vec![]);
        assert!(fx.service.store().list_children(None).await.unwrap().is_empty());
        fx.service.create_folder(None, "Projects").await.unwrap();
        assert_eq!(fx.service.store().list_children(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_move_rejection_leaves_tree_untouched() {
        let projects = Node::folder("Projects", None);
        let year = Node::folder("2024", Some(projects.id));
        let fx = fixture(vec![projects.clone(), year.clone()]);

        let outcome = fx.service.move_node(projects.id, Some(year.id)).await.unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Rejected {
                reason: MoveRejection::IntoDescendant
            }
        );
        let stored = fx.repo.find_by_id(projects.id).await.unwrap().unwrap();
        assert_eq!(stored.parent_id, None);

        let outcome = fx.service.move_node(year.id, None).await.unwrap();
        assert!(outcome.is_moved());
    }

    #[tokio::test]
    async fn test_delete_folder_cascades() {
        let projects = Node::folder("Projects", None);
        let year = Node::folder("2024", Some(projects.id));
        let plan = Node::file("plan.pdf", Some(year.id), "plan-key", 3);
        let keep = Node::file("keep.pdf", None, "keep-key", 3);
        let fx = fixture(vec![projects.clone(), year.clone(), plan.clone(), keep.clone()]);
        fx.storage
            .put_object("plan-key", Bytes::from_static(b"pdf"))
            .await
            .unwrap();

        let report = fx.service.delete(&[projects.id]).await.unwrap();
        assert_eq!(report.deleted, 3);
        assert!(report.is_clean());
        assert_eq!(fx.repo.len().await, 1);
        assert!(!fx.storage.exists("plan-key").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_reports_missing_ids() {
        let fx = fixture(vec![]);
        let ghost = NodeId::new();
        let report = fx.service.delete(&[ghost]).await.unwrap();
        assert_eq!(report.deleted, 0);
        assert_eq!(report.missing, [ghost]);
    }

    #[tokio::test]
    async fn test_assign_flag_moves_single_holder() {
        let old = Node::file("old.pdf", None, "k1", 1);
        let new = Node::file("new.pdf", None, "k2", 1);
        let folder = Node::folder("Docs", None);
        let fx = fixture(vec![old.clone(), new.clone(), folder.clone()]);

        fx.service.assign_flag(old.id, FlagCategory::SafetyPlan).await.unwrap();
        fx.service.assign_flag(new.id, FlagCategory::SafetyPlan).await.unwrap();

        let holders: Vec<_> = fx
            .repo
            .snapshot()
            .await
            .into_iter()
            .filter(|n| n.has_flag(FlagCategory::SafetyPlan))
            .map(|n| n.id)
            .collect();
        assert_eq!(holders, [new.id]);

        let err = fx
            .service
            .assign_flag(folder.id, FlagCategory::Insurance)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_download_and_url() {
        let file = Node::file("plan.pdf", None, "plan-key", 3);
        let fx = fixture(vec![file.clone()]);
        fx.storage
            .put_object("plan-key", Bytes::from_static(b"pdf"))
            .await
            .unwrap();

        let (_, data) = fx.service.download(file.id).await.unwrap();
        assert_eq!(data, Bytes::from_static(b"pdf"));

        let url = fx.service.temporary_url(file.id, None).await.unwrap();
        assert!(url.contains("plan-key?expires="));
    }

    #[tokio::test]
    async fn test_rename() {
        let folder = Node::folder("Old", None);
        let fx = fixture(vec![folder.clone()]);
        let renamed = fx.service.rename(folder.id, "New").await.unwrap();
        assert_eq!(renamed.name, "New");
        assert!(fx.service.rename(NodeId::new(), "x").await.unwrap_err().is(ErrorKind::NotFound));
    }
}
