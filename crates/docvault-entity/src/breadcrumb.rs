//! Breadcrumb entries for path display.

use serde::{Deserialize, Serialize};

use docvault_core::types::NodeId;

use crate::node::Node;

/// One step of the path from the top level to the open folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder id, used for "jump to ancestor" navigation.
    pub id: NodeId,
    /// Folder name.
    pub name: String,
}

impl From<&Node> for Breadcrumb {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
        }
    }
}
