//! Outcome values for node mutations.

use serde::Serialize;

use docvault_core::types::NodeId;
use docvault_entity::node::Node;

use crate::tree::MoveRejection;

/// Result of a move request. A rejection is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The node now lives under the requested parent.
    Moved {
        /// The updated node.
        node: Node,
    },
    /// The validator refused the move; nothing changed.
    Rejected {
        /// Why the move was refused.
        reason: MoveRejection,
    },
}

impl MoveOutcome {
    /// Whether the move was persisted.
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// A blob that could not be removed while its record was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialDeleteWarning {
    /// Storage key of the blob left behind.
    pub storage_key: String,
    /// Why removal failed.
    pub reason: String,
}

/// Result of a bulk delete.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteReport {
    /// Number of metadata rows removed, cascaded descendants included.
    pub deleted: u64,
    /// Requested ids that did not exist.
    pub missing: Vec<NodeId>,
    /// Blobs that stayed behind.
    pub warnings: Vec<PartialDeleteWarning>,
}

impl DeleteReport {
    /// Whether every blob was removed as well.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
