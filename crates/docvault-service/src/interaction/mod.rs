//! Drag/drop interaction handling.

pub mod executor;
pub mod machine;
pub mod transfer;

pub use executor::{DropExecutor, DropResult};
pub use machine::{DragController, DragState, DropAction, DropTarget, PointerTarget};
pub use transfer::{DataTransfer, NODE_PAYLOAD_MIME};
