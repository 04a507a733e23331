//! Sequential batch ingestion: blob first, then the metadata record.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info, warn};

use docvault_core::config::UploadConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::storage::StorageProvider;
use docvault_core::types::{BatchId, NodeId};
use docvault_entity::node::{CreateNode, Node};
use docvault_storage::generate_storage_key;

use crate::store::NodeStore;

use super::progress::{ProgressKey, ProgressStage, ProgressTracker};

/// A file handed to the coordinator.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Original file name.
    pub name: String,
    /// File content.
    pub data: Bytes,
    /// MIME type reported by the source, if any.
    pub mime_type: Option<String>,
}

impl IncomingFile {
    /// Create an incoming file without a declared MIME type.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            mime_type: None,
        }
    }

    /// Attach a declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Declared MIME type, or one guessed from the extension.
    pub fn resolved_mime_type(&self) -> Option<String> {
        self.mime_type
            .clone()
            .or_else(|| mime_guess::from_path(&self.name).first_raw().map(str::to_string))
    }
}

/// What happened to one file of a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Blob and record were both written.
    Stored {
        /// The new file node.
        node: Node,
    },
    /// The file was refused before touching storage.
    Rejected {
        /// Why.
        reason: String,
    },
    /// The blob write failed; nothing was persisted.
    UploadFailed {
        /// Why.
        reason: String,
    },
    /// The blob was written but its record was not: the blob is orphaned.
    InsertFailed {
        /// Key of the orphaned blob.
        storage_key: String,
        /// Why.
        reason: String,
    },
}

/// Per-file line of an [`UploadBatchReport`].
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Progress key of the file.
    pub key: ProgressKey,
    /// Outcome.
    pub outcome: FileOutcome,
}

/// Summary of a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct UploadBatchReport {
    /// Batch identifier, for log correlation.
    pub batch_id: BatchId,
    /// Destination folder (`None` = top level).
    pub folder: Option<NodeId>,
    /// One line per submitted file, in submission order.
    pub files: Vec<FileReport>,
    /// Destination listing re-fetched after the batch, when that succeeded.
    pub listing: Option<Vec<Node>>,
}

impl UploadBatchReport {
    /// Nodes created by this batch.
    pub fn stored(&self) -> impl Iterator<Item = &Node> {
        self.files.iter().filter_map(|f| match &f.outcome {
            FileOutcome::Stored { node } => Some(node),
            _ => None,
        })
    }

    /// Number of files that did not end up stored.
    pub fn failure_count(&self) -> usize {
        self.files.len() - self.stored().count()
    }

    /// Blobs written without a record.
    pub fn orphaned_keys(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter_map(|f| match &f.outcome {
                FileOutcome::InsertFailed { storage_key, .. } => Some(storage_key.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Runs upload batches one file at a time.
#[derive(Debug, Clone)]
pub struct UploadCoordinator {
    store: Arc<NodeStore>,
    storage: Arc<dyn StorageProvider>,
    config: UploadConfig,
}

impl UploadCoordinator {
    /// Creates a new upload coordinator.
    pub fn new(
        store: Arc<NodeStore>,
        storage: Arc<dyn StorageProvider>,
        config: UploadConfig,
    ) -> Self {
        Self {
            store,
            storage,
            config,
        }
    }

    /// Upload `files` into `folder`, reporting progress through `tracker`.
    ///
    /// Fails only when the batch itself is invalid (too many files or a
    /// destination that is not a folder). Per-file failures are recorded in
    /// the report and the batch moves on.
    pub async fn upload_batch(
        &self,
        folder: Option<NodeId>,
        files: Vec<IncomingFile>,
        tracker: &ProgressTracker,
    ) -> AppResult<UploadBatchReport> {
        if files.len() > self.config.max_batch_files {
            return Err(AppError::validation(format!(
                "A batch may contain at most {} files, got {}",
                self.config.max_batch_files,
                files.len()
            )));
        }
        if let Some(folder_id) = folder {
            match self.store.find(folder_id).await? {
                Some(node) if node.is_folder => {}
                Some(node) => {
                    return Err(AppError::validation(format!("{} is not a folder", node.name)));
                }
                None => return Err(AppError::not_found(format!("Folder {folder_id} not found"))),
            }
        }

        let batch_id = BatchId::new();
        info!(%batch_id, folder = ?folder, files = files.len(), "Upload batch started");

        let mut reports = Vec::with_capacity(files.len());
        for (position, file) in files.into_iter().enumerate() {
            let key = ProgressKey::new(batch_id, position, file.name.clone());
            let outcome = self.upload_one(folder, file, &key, tracker).await;
            if !matches!(outcome, FileOutcome::Stored { .. }) {
                tracker.fail(&key);
            }
            reports.push(FileReport { key, outcome });
        }

        let listing = match self.store.refresh(folder).await {
            Ok(listing) => Some(listing.children),
            Err(e) => {
                warn!(%batch_id, error = %e, "Listing refresh after upload failed");
                None
            }
        };
        tracker.clear_after(batch_id, Duration::from_millis(self.config.progress_grace_ms));

        let report = UploadBatchReport {
            batch_id,
            folder,
            files: reports,
            listing,
        };
        info!(
            %batch_id,
            stored = report.stored().count(),
            failed = report.failure_count(),
            "Upload batch finished"
        );
        Ok(report)
    }

    async fn upload_one(
        &self,
        folder: Option<NodeId>,
        file: IncomingFile,
        key: &ProgressKey,
        tracker: &ProgressTracker,
    ) -> FileOutcome {
        if let Err(e) = self.check_file(&file) {
            warn!(file = %key, error = %e, "Upload rejected");
            return FileOutcome::Rejected { reason: e.message };
        }

        let node_id = NodeId::new();
        let storage_key = generate_storage_key(&file.name);
        let mime_type = file.resolved_mime_type();
        let size = file.data.len() as i64;
        tracker.advance(key, ProgressStage::Started);

        if let Err(e) = self.storage.put_object(&storage_key, file.data).await {
            let e = e.rekind(ErrorKind::Upload);
            error!(file = %key, error = %e, "Blob write failed");
            return FileOutcome::UploadFailed { reason: e.message };
        }
        tracker.advance(key, ProgressStage::Uploaded);

        let record = CreateNode {
            id: node_id,
            name: file.name,
            is_folder: false,
            parent_id: folder,
            storage_key: Some(storage_key.clone()),
            size_bytes: Some(size),
            mime_type,
        };
        match self.store.repository().insert(&record).await {
            Ok(node) => {
                tracker.advance(key, ProgressStage::Complete);
                FileOutcome::Stored { node }
            }
            Err(e) => {
                let e = e.rekind(ErrorKind::Insert);
                error!(
                    file = %key,
                    storage_key = %storage_key,
                    error = %e,
                    "Record insert failed; blob left orphaned"
                );
                FileOutcome::InsertFailed {
                    storage_key,
                    reason: e.message,
                }
            }
        }
    }

    fn check_file(&self, file: &IncomingFile) -> AppResult<()> {
        if file.name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if file.data.len() as u64 > self.config.max_file_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_file_size_bytes
            )));
        }
        Ok(())
    }
}
