//! Carries out the action produced by a drop.

use std::sync::Arc;

use tracing::debug;

use docvault_core::result::AppResult;

use crate::node::{MoveOutcome, NodeService};
use crate::upload::{ProgressTracker, UploadBatchReport, UploadCoordinator};

use super::machine::DropAction;

/// Result of executing a drop.
#[derive(Debug, Clone)]
pub enum DropResult {
    /// An internal move was attempted.
    Moved(MoveOutcome),
    /// External files were uploaded.
    Uploaded(UploadBatchReport),
    /// Nothing happened.
    Ignored,
}

/// Routes drop actions to the node service or the upload coordinator.
#[derive(Debug, Clone)]
pub struct DropExecutor {
    nodes: Arc<NodeService>,
    uploads: Arc<UploadCoordinator>,
}

impl DropExecutor {
    /// Creates a new drop executor.
    pub fn new(nodes: Arc<NodeService>, uploads: Arc<UploadCoordinator>) -> Self {
        Self { nodes, uploads }
    }

    /// Run `action`. Rejected moves come back as [`MoveOutcome::Rejected`].
    pub async fn execute(&self, action: DropAction, tracker: &ProgressTracker) -> AppResult<DropResult> {
        match action {
            DropAction::Move { node, target } => {
                let outcome = self.nodes.move_node(node.id, target).await?;
                Ok(DropResult::Moved(outcome))
            }
            DropAction::Upload { folder, files } => {
                let report = self.uploads.upload_batch(folder, files, tracker).await?;
                Ok(DropResult::Uploaded(report))
            }
            DropAction::Ignore => {
                debug!("Drop ignored");
                Ok(DropResult::Ignored)
            }
        }
    }
}
