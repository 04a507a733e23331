//! Per-file upload progress, published through a watch channel.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use docvault_core::types::BatchId;

/// Identifies one file of one batch. The position keeps two files with the
/// same name apart; the batch keeps a reused tracker's batches apart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProgressKey {
    /// Batch the file belongs to.
    pub batch: BatchId,
    /// Zero-based position in the batch.
    pub position: usize,
    /// Original file name.
    pub name: String,
}

impl ProgressKey {
    /// Build a key for the file at `position` of `batch`.
    pub fn new(batch: BatchId, position: usize, name: impl Into<String>) -> Self {
        Self {
            batch,
            position,
            name: name.into(),
        }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.position + 1, self.name)
    }
}

/// Checkpoints reported while a file is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProgressStage {
    /// Processing began.
    Started,
    /// The blob is in the object store.
    Uploaded,
    /// The metadata record exists.
    Complete,
}

impl ProgressStage {
    /// Percentage shown for this stage.
    pub fn percent(self) -> u8 {
        match self {
            Self::Started => 25,
            Self::Uploaded => 75,
            Self::Complete => 100,
        }
    }
}

/// Progress of a single file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressEntry {
    /// Last reached percentage.
    pub percent: u8,
    /// Whether processing stopped with an error.
    pub failed: bool,
}

/// Every file's progress at one instant, grouped by batch and ordered by
/// position.
pub type ProgressSnapshot = BTreeMap<ProgressKey, ProgressEntry>;

/// Shared progress map. Clones publish to the same channel.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    tx: Arc<watch::Sender<ProgressSnapshot>>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ProgressSnapshot::new());
        Self { tx: Arc::new(tx) }
    }

    /// Receive a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.tx.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.tx.borrow().clone()
    }

    /// Record that `key` reached `stage`. Never lowers a value and never
    /// revives a failed entry.
    pub fn advance(&self, key: &ProgressKey, stage: ProgressStage) {
        let percent = stage.percent();
        self.tx.send_if_modified(|map| {
            let entry = map.entry(key.clone()).or_default();
            if entry.failed || entry.percent >= percent {
                return false;
            }
            entry.percent = percent;
            true
        });
    }

    /// Mark `key` failed at whatever percentage it last reached.
    pub fn fail(&self, key: &ProgressKey) {
        self.tx.send_if_modified(|map| {
            let entry = map.entry(key.clone()).or_default();
            if entry.failed {
                return false;
            }
            entry.failed = true;
            true
        });
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.tx.send_if_modified(|map| {
            let changed = !map.is_empty();
            map.clear();
            changed
        });
    }

    /// Remove the entries of `batch`, leaving other batches untouched.
    pub fn clear_batch(&self, batch: BatchId) {
        self.tx.send_if_modified(|map| {
            let before = map.len();
            map.retain(|key, _| key.batch != batch);
            map.len() != before
        });
    }

    /// Clear the entries of `batch` after `grace`, leaving them visible
    /// until then.
    pub fn clear_after(&self, batch: BatchId, grace: Duration) -> JoinHandle<()> {
        let tracker = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            tracker.clear_batch(batch);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(position: usize, name: &str) -> ProgressKey {
        ProgressKey::new(BatchId::default(), position, name)
    }

    #[test]
    fn test_progress_is_monotonic() {
        let tracker = ProgressTracker::new();
        let key = key(0, "a.pdf");

        tracker.advance(&key, ProgressStage::Uploaded);
        tracker.advance(&key, ProgressStage::Started);
        assert_eq!(tracker.snapshot()[&key].percent, 75);

        tracker.fail(&key);
        tracker.advance(&key, ProgressStage::Complete);
        let entry = tracker.snapshot()[&key];
        assert_eq!(entry, ProgressEntry { percent: 75, failed: true });
    }

    #[test]
    fn test_same_name_keys_stay_distinct() {
        let tracker = ProgressTracker::new();
        let batch = BatchId::new();
        tracker.advance(&ProgressKey::new(batch, 0, "scan.pdf"), ProgressStage::Complete);
        tracker.advance(&ProgressKey::new(batch, 1, "scan.pdf"), ProgressStage::Started);
        assert_eq!(tracker.snapshot().len(), 2);
    }

    #[test]
    fn test_failed_entry_does_not_shadow_next_batch() {
        let tracker = ProgressTracker::new();
        let first = ProgressKey::new(BatchId::new(), 0, "scan.pdf");
        tracker.advance(&first, ProgressStage::Started);
        tracker.fail(&first);

        let second = ProgressKey::new(BatchId::new(), 0, "scan.pdf");
        tracker.advance(&second, ProgressStage::Started);
        tracker.advance(&second, ProgressStage::Complete);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot[&first], ProgressEntry { percent: 25, failed: true });
        assert_eq!(snapshot[&second], ProgressEntry { percent: 100, failed: false });
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let tracker = ProgressTracker::new();
        let mut rx = tracker.subscribe();
        tracker.advance(&key(0, "a"), ProgressStage::Started);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_after_grace() {
        let tracker = ProgressTracker::new();
        let batch = BatchId::new();
        tracker.advance(&ProgressKey::new(batch, 0, "a"), ProgressStage::Complete);

        let handle = tracker.clear_after(batch, Duration::from_millis(1500));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(tracker.snapshot().len(), 1);

        handle.await.unwrap();
        assert!(tracker.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_after_spares_later_batch() {
        let tracker = ProgressTracker::new();
        let first = BatchId::new();
        tracker.advance(&ProgressKey::new(first, 0, "a"), ProgressStage::Complete);
        let handle = tracker.clear_after(first, Duration::from_millis(1500));

        let second = ProgressKey::new(BatchId::new(), 0, "a");
        tracker.advance(&second, ProgressStage::Started);

        handle.await.unwrap();
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[&second].percent, 25);
    }
}
