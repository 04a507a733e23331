//! # docvault-service
//!
//! Application layer for DocVault: cached listings and the folder index,
//! the move validator, breadcrumb resolution, node mutations, batch uploads
//! with progress, the drag/drop state machine and the orphan sweep.
//!
//! Services follow constructor injection; all dependencies are provided at
//! construction time via `Arc` references. [`Services`] wires the usual set.

pub mod interaction;
pub mod maintenance;
pub mod node;
pub mod services;
pub mod store;
pub mod tree;
pub mod upload;

pub use interaction::{DataTransfer, DragController, DropAction, DropExecutor, PointerTarget};
pub use maintenance::OrphanSweeper;
pub use node::{DeleteReport, MoveOutcome, NodeService};
pub use services::Services;
pub use store::{FolderIndex, NodeStore};
pub use tree::{MoveRejection, resolve_breadcrumbs, validate_move};
pub use upload::{IncomingFile, ProgressTracker, UploadBatchReport, UploadCoordinator};
