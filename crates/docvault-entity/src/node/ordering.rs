//! Listing order: folders first, then files, each by case-insensitive name.

use std::cmp::Ordering;

use super::model::Node;

/// Compare two nodes for display in a folder listing.
pub fn listing_order(a: &Node, b: &Node) -> Ordering {
    b.is_folder
        .cmp(&a.is_folder)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort a listing in place.
pub fn sort_listing(nodes: &mut [Node]) {
    nodes.sort_by(listing_order);
}
