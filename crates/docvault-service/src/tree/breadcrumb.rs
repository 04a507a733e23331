//! Breadcrumb trail resolution over the folder index.

use docvault_core::types::NodeId;
use docvault_entity::breadcrumb::Breadcrumb;

use crate::store::FolderIndex;

/// Path from the top-level folder down to and including `current`.
///
/// Returns an empty trail when `current` is not a known folder. A chain
/// broken by a missing parent starts at the last resolvable ancestor.
pub fn resolve_breadcrumbs(current: NodeId, folders: &FolderIndex) -> Vec<Breadcrumb> {
    folders
        .ancestors_of(current)
        .into_iter()
        .map(Breadcrumb::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use docvault_entity::node::Node;

    use super::*;

    #[test]
    fn test_trail_runs_top_down() {
        let a = Node::folder("Projects", None);
        let b = Node::folder("2024", Some(a.id));
        let c = Node::folder("Site A", Some(b.id));
        let index = FolderIndex::from_folders([a.clone(), b.clone(), c.clone()]);

        let names: Vec<_> = resolve_breadcrumbs(c.id, &index)
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, ["Projects", "2024", "Site A"]);

        let top = resolve_breadcrumbs(a.id, &index);
        assert_eq!(top, [Breadcrumb::from(&a)]);
    }

    #[test]
    fn test_unknown_folder_gives_empty_trail() {
        let index = FolderIndex::from_folders([Node::folder("Projects", None)]);
        assert!(resolve_breadcrumbs(NodeId::new(), &index).is_empty());
    }
}
