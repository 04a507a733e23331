//! Batch uploads with per-file progress.

pub mod coordinator;
pub mod progress;

pub use coordinator::{FileOutcome, FileReport, IncomingFile, UploadBatchReport, UploadCoordinator};
pub use progress::{ProgressEntry, ProgressKey, ProgressSnapshot, ProgressStage, ProgressTracker};
