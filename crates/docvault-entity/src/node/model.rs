//! Node entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docvault_core::types::NodeId;

use super::flag::FlagCategory;

/// A folder or file in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node identifier.
    pub id: NodeId,
    /// Display name. Files are conventionally `<stem>.<extension>`.
    pub name: String,
    /// Folder/file discriminator.
    pub is_folder: bool,
    /// Owning folder, `None` for a root-level node.
    pub parent_id: Option<NodeId>,
    /// Locator of the file content in the object store.
    pub storage_key: Option<String>,
    /// File size in bytes.
    pub size_bytes: Option<i64>,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// Designated-document flags held by this node.
    #[serde(default)]
    pub flags: BTreeSet<FlagCategory>,
}

impl Node {
    /// Build an empty folder record.
    pub fn folder(name: impl Into<String>, parent_id: Option<NodeId>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            is_folder: true,
            parent_id,
            storage_key: None,
            size_bytes: None,
            mime_type: None,
            created_at: Utc::now(),
            flags: BTreeSet::new(),
        }
    }

    /// Build a file record pointing at `storage_key`.
    pub fn file(
        name: impl Into<String>,
        parent_id: Option<NodeId>,
        storage_key: impl Into<String>,
        size_bytes: i64,
    ) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            is_folder: false,
            parent_id,
            storage_key: Some(storage_key.into()),
            size_bytes: Some(size_bytes),
            mime_type: None,
            created_at: Utc::now(),
            flags: BTreeSet::new(),
        }
    }

    /// Check if this node sits at the top level.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        if self.is_folder {
            return None;
        }
        self.name
            .rsplit_once('.')
            .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
            .map(|(_, ext)| ext.to_lowercase())
    }

    /// Whether the node currently holds `flag`.
    pub fn has_flag(&self, flag: FlagCategory) -> bool {
        self.flags.contains(&flag)
    }
}

/// Data required to create a new node record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNode {
    /// Pre-generated id, so callers can reference the node before insert.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Folder/file discriminator.
    pub is_folder: bool,
    /// Owning folder.
    pub parent_id: Option<NodeId>,
    /// Object store key (files only).
    pub storage_key: Option<String>,
    /// File size in bytes.
    pub size_bytes: Option<i64>,
    /// MIME type.
    pub mime_type: Option<String>,
}

impl CreateNode {
    /// Data for a new empty folder.
    pub fn folder(name: impl Into<String>, parent_id: Option<NodeId>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            is_folder: true,
            parent_id,
            storage_key: None,
            size_bytes: None,
            mime_type: None,
        }
    }

    /// Materialize the record as a [`Node`] stamped with `created_at`.
    pub fn into_node(self, created_at: DateTime<Utc>) -> Node {
        Node {
            id: self.id,
            name: self.name,
            is_folder: self.is_folder,
            parent_id: self.parent_id,
            storage_key: self.storage_key,
            size_bytes: self.size_bytes,
            mime_type: self.mime_type,
            created_at,
            flags: BTreeSet::new(),
        }
    }
}

/// Partial update of a node. Only rename and move are supported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    /// New display name.
    pub name: Option<String>,
    /// New parent; `Some(None)` moves the node to the top level.
    pub parent_id: Option<Option<NodeId>>,
}

impl NodePatch {
    /// Patch that renames a node.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            parent_id: None,
        }
    }

    /// Patch that re-parents a node.
    pub fn move_to(parent_id: Option<NodeId>) -> Self {
        Self {
            name: None,
            parent_id: Some(parent_id),
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }

    /// Apply the patch to a node in place.
    pub fn apply(&self, node: &mut Node) {
        if let Some(name) = &self.name {
            node.name = name.clone();
        }
        if let Some(parent_id) = self.parent_id {
            node.parent_id = parent_id;
        }
    }
}

/// Restricts a listing to one kind of node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    /// Folders and files.
    #[default]
    Any,
    /// Folders only.
    Folders,
    /// Files only.
    Files,
}

impl KindFilter {
    /// Whether `node` passes the filter.
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Any => true,
            Self::Folders => node.is_folder,
            Self::Files => !node.is_folder,
        }
    }

    /// The `is_folder` value to filter on, if any.
    pub fn is_folder(&self) -> Option<bool> {
        match self {
            Self::Any => None,
            Self::Folders => Some(true),
            Self::Files => Some(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        let file = Node::file("Report.PDF", None, "k", 1);
        assert_eq!(file.extension(), Some("pdf".to_string()));
        assert_eq!(Node::file(".env", None, "k", 1).extension(), None);
        assert_eq!(Node::folder("archive.old", None).extension(), None);
    }

    #[test]
    fn test_patch_apply() {
        let parent = NodeId::new();
        let mut node = Node::folder("Drafts", None);
        NodePatch::move_to(Some(parent)).apply(&mut node);
        assert_eq!(node.parent_id, Some(parent));
        assert_eq!(node.name, "Drafts");

        NodePatch::rename("Final").apply(&mut node);
        assert_eq!(node.name, "Final");
        assert!(NodePatch::default().is_empty());
    }
}
