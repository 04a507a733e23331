//! File upload command.

use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::oneshot;
use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::types::NodeId;
use docvault_service::upload::{FileOutcome, ProgressSnapshot};
use docvault_service::{IncomingFile, ProgressTracker, Services};

use crate::output::{self, OutputFormat};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Paths of the files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Target folder ID (omit for the top level)
    #[arg(short, long)]
    pub folder: Option<NodeId>,
}

/// Upload result row
#[derive(Debug, Serialize, Tabled)]
struct UploadRow {
    /// File
    file: String,
    /// Status
    status: String,
    /// Node ID or error
    detail: String,
}

/// Lines for entries that changed since `shown`.
fn progress_lines(shown: &ProgressSnapshot, snapshot: &ProgressSnapshot) -> Vec<String> {
    snapshot
        .iter()
        .filter(|(key, entry)| shown.get(*key) != Some(*entry))
        .map(|(key, entry)| {
            let state = if entry.failed { " failed" } else { "" };
            format!("  [{:>3}%{}] {}", entry.percent, state, key)
        })
        .collect()
}

/// Execute the upload command
pub async fn execute(args: &UploadArgs, services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::validation(format!("Invalid file path: {}", path.display())))?
            .to_string();
        let content = tokio::fs::read(path).await.map_err(|e| {
            AppError::not_found(format!("Cannot read {}: {e}", path.display()))
        })?;
        files.push(IncomingFile::new(name, Bytes::from(content)));
    }

    let tracker = ProgressTracker::new();
    let mut progress = tracker.subscribe();
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let printer = tokio::spawn(async move {
        let mut shown = ProgressSnapshot::new();
        loop {
            tokio::select! {
                changed = progress.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = &mut stop_rx => {
                    // Flush whatever arrived after the last wake-up.
                    let last = progress.borrow_and_update().clone();
                    for line in progress_lines(&shown, &last) {
                        eprintln!("{line}");
                    }
                    break;
                }
            }
            let snapshot = progress.borrow_and_update().clone();
            for line in progress_lines(&shown, &snapshot) {
                eprintln!("{line}");
            }
            shown = snapshot;
        }
    });

    let result = services.uploads.upload_batch(args.folder, files, &tracker).await;
    let _ = stop_tx.send(());
    if let Err(e) = printer.await {
        debug!(error = %e, "Progress printer ended abnormally");
    }
    let report = result?;

    match format {
        OutputFormat::Table => {
            let rows: Vec<UploadRow> = report
                .files
                .iter()
                .map(|f| {
                    let (status, detail) = match &f.outcome {
                        FileOutcome::Stored { node } => ("stored", node.id.to_string()),
                        FileOutcome::Rejected { reason } => ("rejected", reason.clone()),
                        FileOutcome::UploadFailed { reason } => ("upload failed", reason.clone()),
                        FileOutcome::InsertFailed { storage_key, reason } => {
                            ("insert failed", format!("{reason} (orphaned blob {storage_key})"))
                        }
                    };
                    UploadRow {
                        file: f.key.name.clone(),
                        status: status.to_string(),
                        detail,
                    }
                })
                .collect();
            output::print_list(&rows, format);

            let failures = report.failure_count();
            if failures == 0 {
                output::print_success(&format!("{} file(s) uploaded", report.files.len()));
            } else {
                output::print_warning(&format!(
                    "{} of {} file(s) failed",
                    failures,
                    report.files.len()
                ));
            }
        }
        OutputFormat::Json => output::print_item(&report, format),
    }
    Ok(())
}
