//! Drag/drop state machine: internal moves versus external file drops.

use tracing::debug;

use docvault_core::types::NodeId;
use docvault_entity::node::Node;

use crate::upload::IncomingFile;

use super::transfer::DataTransfer;

/// Where a hovered drag would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// A specific folder.
    Folder(NodeId),
    /// The background of the open folder.
    CurrentFolder,
}

/// What the pointer is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// A folder entry.
    Folder(NodeId),
    /// A file entry; `parent` is the folder that holds it.
    File {
        /// The file.
        id: NodeId,
        /// Folder holding the file.
        parent: Option<NodeId>,
    },
    /// Empty space in the open folder.
    Background,
}

impl From<&Node> for PointerTarget {
    fn from(node: &Node) -> Self {
        if node.is_folder {
            Self::Folder(node.id)
        } else {
            Self::File {
                id: node.id,
                parent: node.parent_id,
            }
        }
    }
}

/// Interaction state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// Nothing is being dragged.
    #[default]
    Idle,
    /// An existing node is being dragged with no drop target highlighted.
    DraggingInternal {
        /// The dragged node.
        node: Node,
    },
    /// An existing node is being dragged over a valid-looking target.
    HoveringTarget {
        /// The dragged node.
        node: Node,
        /// The highlighted target.
        target: DropTarget,
    },
}

/// What a drop asks the application to do.
#[derive(Debug, Clone)]
pub enum DropAction {
    /// Relocate `node` under `target` (`None` = top level), subject to the
    /// move validator.
    Move {
        /// Node recovered from the payload.
        node: Node,
        /// Effective destination.
        target: Option<NodeId>,
    },
    /// Upload external files into `folder`, the open folder.
    Upload {
        /// Destination.
        folder: Option<NodeId>,
        /// Files from the payload.
        files: Vec<IncomingFile>,
    },
    /// Nothing to do.
    Ignore,
}

/// Tracks one pointer's drag interaction over the open folder.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    current_folder: Option<NodeId>,
}

impl DragController {
    /// Controller for a view showing `current_folder`.
    pub fn new(current_folder: Option<NodeId>) -> Self {
        Self {
            state: DragState::Idle,
            current_folder,
        }
    }

    /// Current state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Folder currently open in the view.
    pub fn current_folder(&self) -> Option<NodeId> {
        self.current_folder
    }

    /// Navigate to another folder. Any drag in progress is abandoned.
    pub fn open_folder(&mut self, folder: Option<NodeId>) {
        self.current_folder = folder;
        self.state = DragState::Idle;
    }

    /// Start dragging an existing node and write it into `transfer`.
    pub fn drag_start(
        &mut self,
        node: &Node,
        transfer: &mut DataTransfer,
    ) -> Result<(), serde_json::Error> {
        transfer.set_node(node)?;
        debug!(node_id = %node.id, "Drag started");
        self.state = DragState::DraggingInternal { node: node.clone() };
        Ok(())
    }

    /// Pointer moved over `over`. Only internal drags react.
    pub fn hover(&mut self, over: &PointerTarget) {
        let node = match &self.state {
            DragState::Idle => return,
            DragState::DraggingInternal { node } | DragState::HoveringTarget { node, .. } => {
                node.clone()
            }
        };

        let target = match over {
            PointerTarget::Folder(id) if *id != node.id => Some(DropTarget::Folder(*id)),
            PointerTarget::Folder(_) | PointerTarget::File { .. } => None,
            PointerTarget::Background => Some(DropTarget::CurrentFolder),
        };

        self.state = match target {
            Some(target) => DragState::HoveringTarget { node, target },
            None => DragState::DraggingInternal { node },
        };
    }

    /// Drop `transfer` over `over` and return the action to run. The state
    /// always returns to idle.
    pub fn drop(&mut self, mut transfer: DataTransfer, over: &PointerTarget) -> DropAction {
        self.state = DragState::Idle;

        if transfer.has_node() {
            let Some(node) = transfer.node() else {
                return DropAction::Ignore;
            };
            let target = match over {
                PointerTarget::Folder(id) => Some(*id),
                PointerTarget::File { parent, .. } => *parent,
                PointerTarget::Background => self.current_folder,
            };
            return DropAction::Move { node, target };
        }

        let files = transfer.take_files();
        if files.is_empty() {
            return DropAction::Ignore;
        }
        DropAction::Upload {
            folder: self.current_folder,
            files,
        }
    }

    /// Drag ended without a drop (cancelled or pointer left the view).
    pub fn drag_end(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_transitions() {
        let open = Node::folder("Projects", None);
        let dragged = Node::folder("2023", Some(open.id));
        let sibling = Node::folder("2024", Some(open.id));
        let file = Node::file("a.pdf", Some(open.id), "k", 1);
        let mut controller = DragController::new(Some(open.id));
        let mut transfer = DataTransfer::new();

        controller.drag_start(&dragged, &mut transfer).unwrap();
        assert!(matches!(controller.state(), DragState::DraggingInternal { .. }));

        controller.hover(&PointerTarget::from(&sibling));
        assert!(matches!(
            controller.state(),
            DragState::HoveringTarget { target: DropTarget::Folder(id), .. } if *id == sibling.id
        ));

        controller.hover(&PointerTarget::from(&dragged));
        assert!(matches!(controller.state(), DragState::DraggingInternal { .. }));

        controller.hover(&PointerTarget::Background);
        assert!(matches!(
            controller.state(),
            DragState::HoveringTarget { target: DropTarget::CurrentFolder, .. }
        ));

        controller.hover(&PointerTarget::from(&file));
        assert!(matches!(controller.state(), DragState::DraggingInternal { .. }));

        controller.drag_end();
        assert_eq!(controller.state(), &DragState::Idle);
    }

    #[test]
    fn test_hover_ignored_when_idle() {
        let mut controller = DragController::new(None);
        controller.hover(&PointerTarget::Background);
        assert_eq!(controller.state(), &DragState::Idle);
    }

    #[test]
    fn test_internal_drop_targets() {
        let open = Node::folder("Projects", None);
        let dragged = Node::file("plan.pdf", None, "k", 1);
        let other = Node::file("other.pdf", Some(NodeId::new()), "k2", 1);
        let mut controller = DragController::new(Some(open.id));

        let mut transfer = DataTransfer::new();
        controller.drag_start(&dragged, &mut transfer).unwrap();
        match controller.drop(transfer.clone(), &PointerTarget::Background) {
            DropAction::Move { node, target } => {
                assert_eq!(node.id, dragged.id);
                assert_eq!(target, Some(open.id));
            }
            other => panic!("unexpected action: {other:?}"),
        }
        assert_eq!(controller.state(), &DragState::Idle);

        match controller.drop(transfer, &PointerTarget::from(&other)) {
            DropAction::Move { target, .. } => assert_eq!(target, other.parent_id),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_external_drop_uploads_into_open_folder() {
        let open = Node::folder("Projects", None);
        let hovered = Node::folder("2024", Some(open.id));
        let mut controller = DragController::new(Some(open.id));

        let transfer = DataTransfer::with_files(vec![IncomingFile::new("report.pdf", "pdf")]);
        match controller.drop(transfer, &PointerTarget::from(&hovered)) {
            DropAction::Upload { folder, files } => {
                assert_eq!(folder, Some(open.id));
                assert_eq!(files.len(), 1);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_empty_drop_ignored() {
        let mut controller = DragController::new(None);
        assert!(matches!(
            controller.drop(DataTransfer::new(), &PointerTarget::Background),
            DropAction::Ignore
        ));
    }
}
