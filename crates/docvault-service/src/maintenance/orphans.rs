//! Reconciles the object store against the metadata collection.
//!
//! Uploads write the blob before the record, so a failed insert leaves a
//! blob nothing points at. The sweep finds and removes those.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use docvault_core::result::AppResult;
use docvault_core::traits::storage::{RemovalFailure, StorageProvider};
use docvault_database::NodeRepository;
use docvault_storage::key_timestamp;

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Keys held by the object store.
    pub scanned: usize,
    /// Keys referenced by at least one record.
    pub referenced: usize,
    /// Unreferenced keys younger than the minimum age, left alone.
    pub skipped_recent: usize,
    /// Unreferenced keys eligible for removal.
    pub orphans: Vec<String>,
    /// Orphans actually removed (empty on a dry run).
    pub removed: Vec<String>,
    /// Orphans that could not be removed.
    pub failed: Vec<RemovalFailure>,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// Finds blobs with no metadata record.
#[derive(Debug, Clone)]
pub struct OrphanSweeper {
    repo: Arc<dyn NodeRepository>,
    storage: Arc<dyn StorageProvider>,
    min_age: Duration,
}

impl OrphanSweeper {
    /// Creates a sweeper that ignores blobs younger than `min_age`, which may
    /// belong to an upload whose record is still being written.
    pub fn new(
        repo: Arc<dyn NodeRepository>,
        storage: Arc<dyn StorageProvider>,
        min_age: Duration,
    ) -> Self {
        Self {
            repo,
            storage,
            min_age,
        }
    }

    /// Run a sweep. With `dry_run` nothing is removed.
    pub async fn run(&self, dry_run: bool) -> AppResult<SweepReport> {
        let stored = self.storage.list_keys().await?;
        let referenced: HashSet<String> = self.repo.list_storage_keys().await?.into_iter().collect();
        let cutoff = Utc::now().timestamp_millis() - self.min_age.as_millis() as i64;

        let mut report = SweepReport {
            scanned: stored.len(),
            referenced: referenced.len(),
            dry_run,
            ..SweepReport::default()
        };

        for key in stored {
            if referenced.contains(&key) {
                continue;
            }
            match key_timestamp(&key) {
                Some(stamp) if stamp > cutoff => report.skipped_recent += 1,
                _ => report.orphans.push(key),
            }
        }

        if !dry_run && !report.orphans.is_empty() {
            let removal = self.storage.remove_objects(&report.orphans).await?;
            for failure in &removal.failed {
                warn!(storage_key = %failure.key, reason = %failure.reason, "Orphan removal failed");
            }
            report.removed = removal.removed;
            report.failed = removal.failed;
        }

        info!(
            scanned = report.scanned,
            orphans = report.orphans.len(),
            removed = report.removed.len(),
            dry_run,
            "Orphan sweep finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use docvault_database::MemoryNodeRepository;
    use docvault_entity::node::Node;
    use docvault_storage::generate_storage_key;
    use docvault_storage::providers::MemoryStorageProvider;

    use super::*;

    async fn setup() -> (OrphanSweeper, Arc<MemoryStorageProvider>, String) {
        let storage = Arc::new(MemoryStorageProvider::default());
        storage.put_object("old-kept", Bytes::from("a")).await.unwrap();
        storage.put_object("old-orphan", Bytes::from("b")).await.unwrap();
        let fresh = generate_storage_key("in-flight.pdf");
        storage.put_object(&fresh, Bytes::from("c")).await.unwrap();

        let repo = MemoryNodeRepository::with_nodes([Node::file("kept.pdf", None, "old-kept", 1)]);
        let sweeper = OrphanSweeper::new(Arc::new(repo), storage.clone(), Duration::from_secs(600));
        (sweeper, storage, fresh)
    }

    #[tokio::test]
    async fn test_dry_run_reports_without_removing() {
        let (sweeper, storage, _) = setup().await;
        let report = sweeper.run(true).await.unwrap();

        assert_eq!(report.scanned, 3);
        assert_eq!(report.orphans, ["old-orphan"]);
        assert_eq!(report.skipped_recent, 1);
        assert!(report.removed.is_empty());
        assert_eq!(storage.len().await, 3);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_old_orphans() {
        let (sweeper, storage, fresh) = setup().await;
        let report = sweeper.run(false).await.unwrap();

        assert_eq!(report.removed, ["old-orphan"]);
        assert!(storage.exists("old-kept").await.unwrap());
        assert!(storage.exists(&fresh).await.unwrap());
        assert!(!storage.exists("old-orphan").await.unwrap());
    }
}
