//! External file drops.

mod helpers;

use docvault_entity::node::Node;
use docvault_service::interaction::{DataTransfer, DragController, DropResult, PointerTarget};
use docvault_service::{IncomingFile, ProgressTracker};

#[tokio::test]
async fn test_external_drop_uploads_into_open_folder_not_hovered_one() {
    let open = Node::folder("Projects", None);
    let hovered = Node::folder("Subfolder", Some(open.id));
    let app = helpers::TestApp::new(vec![open.clone(), hovered.clone()]);

    let mut controller = DragController::new(Some(open.id));
    controller.hover(&PointerTarget::from(&hovered));
    let transfer = DataTransfer::with_files(vec![IncomingFile::new("report.pdf", "%PDF-1.7")]);
    let action = controller.drop(transfer, &PointerTarget::from(&hovered));

    let tracker = ProgressTracker::new();
    let result = app.services.drops.execute(action, &tracker).await.unwrap();

    let DropResult::Uploaded(report) = result else {
        panic!("expected an upload");
    };
    let stored: Vec<_> = report.stored().collect();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].parent_id, Some(open.id));
    assert_eq!(stored[0].name, "report.pdf");

    let in_hovered = app.services.store.list_children(Some(hovered.id)).await.unwrap();
    assert!(in_hovered.is_empty());
    assert_eq!(app.storage.keys().await.len(), 1);
}
