//! Upload batches with failures part-way through.

mod helpers;

use std::time::Duration;

use docvault_service::maintenance::OrphanSweeper;
use docvault_service::upload::{FileOutcome, ProgressKey};
use docvault_service::{IncomingFile, ProgressTracker};

#[tokio::test]
async fn test_failed_blob_write_does_not_stop_batch() {
    let app = helpers::TestApp::new(vec![]);
    app.storage.fail_put("b.pdf");
    let tracker = ProgressTracker::new();

    let report = app
        .services
        .uploads
        .upload_batch(
            None,
            vec![
                IncomingFile::new("a.pdf", "a"),
                IncomingFile::new("b.pdf", "b"),
                IncomingFile::new("c.pdf", "c"),
            ],
            &tracker,
        )
        .await
        .unwrap();

    let names: Vec<_> = report.stored().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["a.pdf", "c.pdf"]);
    assert!(matches!(report.files[1].outcome, FileOutcome::UploadFailed { .. }));

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot[&ProgressKey::new(report.batch_id, 0, "a.pdf")].percent, 100);
    let failed = snapshot[&ProgressKey::new(report.batch_id, 1, "b.pdf")];
    assert_eq!(failed.percent, 25);
    assert!(failed.failed);
    assert_eq!(snapshot[&ProgressKey::new(report.batch_id, 2, "c.pdf")].percent, 100);

    let listing = report.listing.unwrap();
    assert_eq!(listing.len(), 2);
}

#[tokio::test]
async fn test_insert_failure_leaves_orphan_for_sweep() {
    let app = helpers::TestApp::new(vec![]);
    app.repo
        .fail_insert_for
        .lock()
        .unwrap()
        .insert("lost.pdf".to_string());
    let tracker = ProgressTracker::new();

    let report = app
        .services
        .uploads
        .upload_batch(None, vec![IncomingFile::new("lost.pdf", "x")], &tracker)
        .await
        .unwrap();

    let orphans = report.orphaned_keys();
    assert_eq!(orphans.len(), 1);
    assert_eq!(tracker.snapshot()[&ProgressKey::new(report.batch_id, 0, "lost.pdf")].percent, 75);
    assert_eq!(app.storage.keys().await, [orphans[0].to_string()]);

    let sweeper = OrphanSweeper::new(app.repo.clone(), app.storage.clone(), Duration::ZERO);
    let swept = sweeper.run(false).await.unwrap();
    assert_eq!(swept.removed, [orphans[0].to_string()]);
    assert!(app.storage.keys().await.is_empty());
}

#[tokio::test]
async fn test_reused_tracker_keeps_batches_apart() {
    let app = helpers::TestApp::new(vec![]);
    let tracker = ProgressTracker::new();

    app.storage.fail_put("scan.pdf");
    let first = app
        .services
        .uploads
        .upload_batch(None, vec![IncomingFile::new("scan.pdf", "1")], &tracker)
        .await
        .unwrap();
    assert_eq!(first.stored().count(), 0);

    app.storage.allow_put("scan.pdf");
    let second = app
        .services
        .uploads
        .upload_batch(None, vec![IncomingFile::new("scan.pdf", "2")], &tracker)
        .await
        .unwrap();
    assert_eq!(second.stored().count(), 1);

    let snapshot = tracker.snapshot();
    let stale = snapshot[&ProgressKey::new(first.batch_id, 0, "scan.pdf")];
    assert!(stale.failed);
    let fresh = snapshot[&ProgressKey::new(second.batch_id, 0, "scan.pdf")];
    assert_eq!(fresh.percent, 100);
    assert!(!fresh.failed);
}
