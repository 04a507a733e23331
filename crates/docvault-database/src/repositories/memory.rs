//! In-process node repository.
//!
//! Used by the test suites and by embedders that need no database.
//! Behaves like the PostgreSQL repository, including listing order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::NodeId;
use docvault_entity::node::{CreateNode, FlagCategory, KindFilter, Node, NodePatch, sort_listing};

use super::NodeRepository;

/// Node repository backed by a `HashMap` behind an async lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryNodeRepository {
    nodes: Arc<RwLock<HashMap<NodeId, Node>>>,
}

impl MemoryNodeRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `nodes`.
    pub fn with_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let map = nodes.into_iter().map(|n| (n.id, n)).collect();
        Self {
            nodes: Arc::new(RwLock::new(map)),
        }
    }

    /// Copy of every stored node, in listing order.
    pub async fn snapshot(&self) -> Vec<Node> {
        let mut all: Vec<Node> = self.nodes.read().await.values().cloned().collect();
        sort_listing(&mut all);
        all
    }

    /// Number of stored nodes.
    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    /// Whether the repository holds no nodes.
    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

#[async_trait]
impl NodeRepository for MemoryNodeRepository {
    async fn list_by_parent(&self, parent: Option<NodeId>, kind: KindFilter) -> AppResult<Vec<Node>> {
        let nodes = self.nodes.read().await;
        let mut children: Vec<Node> = nodes
            .values()
            .filter(|n| n.parent_id == parent && kind.matches(n))
            .cloned()
            .collect();
        sort_listing(&mut children);
        Ok(children)
    }

    async fn list_all_folders(&self) -> AppResult<Vec<Node>> {
        let nodes = self.nodes.read().await;
        let mut folders: Vec<Node> = nodes.values().filter(|n| n.is_folder).cloned().collect();
        sort_listing(&mut folders);
        Ok(folders)
    }

    async fn find_by_id(&self, id: NodeId) -> AppResult<Option<Node>> {
        Ok(self.nodes.read().await.get(&id).cloned())
    }

    async fn find_ancestors(&self, id: NodeId) -> AppResult<Vec<Node>> {
        let nodes = self.nodes.read().await;
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(id);

        while let Some(current) = cursor {
            if !seen.insert(current) {
                break;
            }
            let Some(node) = nodes.get(&current) else {
                break;
            };
            chain.push(node.clone());
            cursor = node.parent_id;
        }

        chain.reverse();
        Ok(chain)
    }

    async fn insert(&self, data: &CreateNode) -> AppResult<Node> {
        let mut nodes = self.nodes.write().await;
        if nodes.contains_key(&data.id) {
            return Err(AppError::conflict(format!("Node {} already exists", data.id)));
        }
        let node = data.clone().into_node(Utc::now());
        nodes.insert(node.id, node.clone());
        Ok(node)
    }

    async fn update(&self, id: NodeId, patch: &NodePatch) -> AppResult<Node> {
        let mut nodes = self.nodes.write().await;
        let node = nodes
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Node {id} not found")))?;
        patch.apply(node);
        Ok(node.clone())
    }

    async fn delete(&self, ids: &[NodeId]) -> AppResult<u64> {
        let mut nodes = self.nodes.write().await;
        let removed = ids.iter().filter(|id| nodes.remove(id).is_some()).count();
        Ok(removed as u64)
    }

    async fn clear_flag(&self, flag: FlagCategory) -> AppResult<u64> {
        let mut nodes = self.nodes.write().await;
        let mut cleared = 0;
        for node in nodes.values_mut() {
            if node.flags.remove(&flag) {
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn set_flag(&self, id: NodeId, flag: FlagCategory) -> AppResult<Node> {
        let mut nodes = self.nodes.write().await;
        let node = nodes
            .get_mut(&id)
            .filter(|n| !n.is_folder)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        node.flags.insert(flag);
        Ok(node.clone())
    }

    async fn list_storage_keys(&self) -> AppResult<Vec<String>> {
        let nodes = self.nodes.read().await;
        let keys: HashSet<String> = nodes
            .values()
            .filter(|n| !n.is_folder)
            .filter_map(|n| n.storage_key.clone())
            .collect();
        Ok(keys.into_iter().collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
