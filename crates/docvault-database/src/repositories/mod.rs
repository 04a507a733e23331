//! Metadata collection contract and its implementations.

pub mod memory;
pub mod node;

use async_trait::async_trait;

use docvault_core::result::AppResult;
use docvault_core::types::NodeId;
use docvault_entity::node::{CreateNode, FlagCategory, KindFilter, Node, NodePatch};

pub use memory::MemoryNodeRepository;
pub use node::PgNodeRepository;

/// Access to the flat node collection.
///
/// Implementations do not enforce tree invariants; the service layer runs
/// the move validator before calling [`NodeRepository::update`].
#[async_trait]
pub trait NodeRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Direct children of `parent` (`None` = top level), in listing order.
    async fn list_by_parent(&self, parent: Option<NodeId>, kind: KindFilter) -> AppResult<Vec<Node>>;

    /// Every folder, regardless of position.
    async fn list_all_folders(&self) -> AppResult<Vec<Node>>;

    /// Point lookup.
    async fn find_by_id(&self, id: NodeId) -> AppResult<Option<Node>>;

    /// The node and its ancestors, top level first, in one query.
    async fn find_ancestors(&self, id: NodeId) -> AppResult<Vec<Node>>;

    /// Insert a record and return it as stored.
    async fn insert(&self, data: &CreateNode) -> AppResult<Node>;

    /// Apply a partial update and return the updated node.
    async fn update(&self, id: NodeId, patch: &NodePatch) -> AppResult<Node>;

    /// Delete the given rows. Returns how many existed.
    async fn delete(&self, ids: &[NodeId]) -> AppResult<u64>;

    /// Clear `flag` on every node holding it. Returns how many were cleared.
    async fn clear_flag(&self, flag: FlagCategory) -> AppResult<u64>;

    /// Set `flag` on a file.
    async fn set_flag(&self, id: NodeId, flag: FlagCategory) -> AppResult<Node>;

    /// Every storage key referenced by a record.
    async fn list_storage_keys(&self) -> AppResult<Vec<String>>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
