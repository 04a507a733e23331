//! Nested folder tree projection for hierarchical display.

use serde::{Deserialize, Serialize};

use docvault_core::types::NodeId;

/// A folder in a nested tree view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTreeNode {
    /// Folder ID.
    pub id: NodeId,
    /// Folder name.
    pub name: String,
    /// Depth level (0 for top-level folders).
    pub depth: usize,
    /// Child folder nodes, in listing order.
    pub children: Vec<FolderTreeNode>,
}

impl FolderTreeNode {
    /// Total number of folders in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(FolderTreeNode::count).sum::<usize>()
    }
}
