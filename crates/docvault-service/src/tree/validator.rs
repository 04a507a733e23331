//! Move legality: the cycle guard.

use serde::Serialize;
use thiserror::Error;

use docvault_core::types::NodeId;
use docvault_entity::node::Node;

use crate::store::FolderIndex;

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveRejection {
    /// The target is the dragged node itself.
    #[error("a node cannot be moved into itself")]
    OntoSelf,
    /// The node already lives in the target.
    #[error("the node is already in the target folder")]
    AlreadyThere,
    /// The target is not a known folder.
    #[error("the target is not an existing folder")]
    UnknownTarget,
    /// The target lies inside the dragged folder's subtree.
    #[error("a folder cannot be moved into its own subtree")]
    IntoDescendant,
}

/// Decide whether `dragged` may become a child of `target` (`None` = top
/// level). Pure; consults only `folders`.
pub fn validate_move(
    dragged: &Node,
    target: Option<NodeId>,
    folders: &FolderIndex,
) -> Result<(), MoveRejection> {
    if target == Some(dragged.id) {
        return Err(MoveRejection::OntoSelf);
    }
    if target == dragged.parent_id {
        return Err(MoveRejection::AlreadyThere);
    }

    let Some(target) = target else {
        return Ok(());
    };
    if !folders.contains(target) {
        return Err(MoveRejection::UnknownTarget);
    }
    if folders.chain_contains(target, dragged.id) {
        return Err(MoveRejection::IntoDescendant);
    }
    Ok(())
}
