//! In-memory folder index built from the flat folder set.
//!
//! The index is an arena keyed by id plus a `parent -> children` table.
//! Every walk tolerates malformed data: a parent that does not resolve ends
//! the walk, and a repeated id stops it.

use std::collections::{HashMap, HashSet, VecDeque};

use docvault_core::types::NodeId;
use docvault_entity::node::{Node, sort_listing};
use docvault_entity::tree::FolderTreeNode;

/// Snapshot of every folder, indexed for ancestry and subtree queries.
#[derive(Debug, Clone, Default)]
pub struct FolderIndex {
    nodes: HashMap<NodeId, Node>,
    children: HashMap<Option<NodeId>, Vec<NodeId>>,
}

impl FolderIndex {
    /// Build an index from a folder listing. Non-folder entries are ignored.
    pub fn from_folders(folders: impl IntoIterator<Item = Node>) -> Self {
        let mut sorted: Vec<Node> = folders.into_iter().filter(|n| n.is_folder).collect();
        sort_listing(&mut sorted);

        let mut children: HashMap<Option<NodeId>, Vec<NodeId>> = HashMap::new();
        for folder in &sorted {
            children.entry(folder.parent_id).or_default().push(folder.id);
        }

        Self {
            nodes: sorted.into_iter().map(|n| (n.id, n)).collect(),
            children,
        }
    }

    /// Look up a folder.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Whether `id` is a known folder.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of indexed folders.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index holds no folders.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct sub-folders of `parent` (`None` = top level), in listing order.
    pub fn children_of(&self, parent: Option<NodeId>) -> Vec<&Node> {
        self.children
            .get(&parent)
            .map(|ids| ids.iter().filter_map(|id| self.nodes.get(id)).collect())
            .unwrap_or_default()
    }

    /// `id` and its ancestors, top level first. Empty when `id` is unknown.
    pub fn ancestors_of(&self, id: NodeId) -> Vec<&Node> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(id);

        while let Some(current) = cursor {
            if !seen.insert(current) {
                break;
            }
            let Some(node) = self.nodes.get(&current) else {
                break;
            };
            chain.push(node);
            cursor = node.parent_id;
        }

        chain.reverse();
        chain
    }

    /// Whether `candidate` lies on the parent chain starting at `start`
    /// (inclusive).
    pub fn chain_contains(&self, start: NodeId, candidate: NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = Some(start);

        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            if !seen.insert(current) {
                return false;
            }
            cursor = self.nodes.get(&current).and_then(|n| n.parent_id);
        }
        false
    }

    /// Every folder below `id`, breadth first, excluding `id` itself.
    pub fn descendants_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            for child in self.children.get(&Some(current)).into_iter().flatten() {
                if seen.insert(*child) {
                    out.push(*child);
                    queue.push_back(*child);
                }
            }
        }
        out
    }

    /// Nested projection of the whole hierarchy.
    ///
    /// Folders whose parent is missing from the index are shown at the top
    /// level so that nothing silently disappears.
    pub fn tree(&self) -> Vec<FolderTreeNode> {
        let mut seen = HashSet::new();
        let mut roots: Vec<&Node> = self
            .nodes
            .values()
            .filter(|n| n.parent_id.is_none_or(|p| !self.nodes.contains_key(&p)))
            .collect();
        roots.sort_by(|a, b| docvault_entity::node::listing_order(a, b));

        roots
            .into_iter()
            .map(|root| self.subtree(root, 0, &mut seen))
            .collect()
    }

    fn subtree(&self, node: &Node, depth: usize, seen: &mut HashSet<NodeId>) -> FolderTreeNode {
        seen.insert(node.id);
        let mut children = Vec::new();
        for child in self.children_of(Some(node.id)) {
            if !seen.contains(&child.id) {
                children.push(self.subtree(child, depth + 1, seen));
            }
        }

        FolderTreeNode {
            id: node.id,
            name: node.name.clone(),
            depth,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Node, Node, Node) {
        let a = Node::folder("Projects", None);
        let b = Node::folder("2024", Some(a.id));
        let c = Node::folder("Site A", Some(b.id));
        (a, b, c)
    }

    #[test]
    fn test_ancestors_top_level_first() {
        let (a, b, c) = chain();
        let index = FolderIndex::from_folders([c.clone(), a.clone(), b.clone()]);
        let ids: Vec<_> = index.ancestors_of(c.id).iter().map(|n| n.id).collect();
        assert_eq!(ids, [a.id, b.id, c.id]);
        assert!(index.ancestors_of(NodeId::new()).is_empty());
    }

    #[test]
    fn test_ancestors_stop_at_missing_parent() {
        let (_, b, c) = chain();
        let index = FolderIndex::from_folders([b.clone(), c.clone()]);
        let ids: Vec<_> = index.ancestors_of(c.id).iter().map(|n| n.id).collect();
        assert_eq!(ids, [b.id, c.id]);
    }

    #[test]
    fn test_walks_terminate_on_cycles() {
        let mut a = Node::folder("A", None);
        let b = Node::folder("B", Some(a.id));
        a.parent_id = Some(b.id);
        let index = FolderIndex::from_folders([a.clone(), b.clone()]);

        assert_eq!(index.ancestors_of(a.id).len(), 2);
        assert!(!index.chain_contains(a.id, NodeId::new()));
        assert_eq!(index.descendants_of(a.id), [b.id]);
    }

    #[test]
    fn test_descendants_and_children() {
        let (a, b, c) = chain();
        let sibling = Node::folder("archive", Some(a.id));
        let index = FolderIndex::from_folders([a.clone(), b.clone(), c.clone(), sibling.clone()]);

        let names: Vec<_> = index.children_of(Some(a.id)).iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["2024", "archive"]);

        let mut below = index.descendants_of(a.id);
        below.sort();
        let mut expected = vec![b.id, c.id, sibling.id];
        expected.sort();
        assert_eq!(below, expected);
    }

    #[test]
    fn test_tree_promotes_orphans() {
        let (a, b, c) = chain();
        let stray = Node::folder("stray", Some(NodeId::new()));
        let index = FolderIndex::from_folders([a, b, c, stray]);

        let tree = index.tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.iter().map(FolderTreeNode::count).sum::<usize>(), 4);
        assert_eq!(tree[0].children[0].children[0].depth, 2);
    }

    #[test]
    fn test_files_are_ignored() {
        let folder = Node::folder("Docs", None);
        let file = Node::file("a.txt", Some(folder.id), "k", 1);
        let index = FolderIndex::from_folders([folder, file.clone()]);
        assert_eq!(index.len(), 1);
        assert!(!index.contains(file.id));
    }
}
