//! Cache key builders for listing cache entries.
//!
//! Centralising key construction keeps invalidation in step with the
//! keys that reads populate.

use docvault_core::types::NodeId;

/// Prefix applied to all DocVault cache keys.
const PREFIX: &str = "docvault";

/// Prefix shared by every listing entry, used for bulk invalidation.
pub fn listing_prefix() -> String {
    format!("{PREFIX}:list:")
}

/// Cache key for the direct children of a folder (or the top level).
pub fn children(parent: Option<NodeId>) -> String {
    match parent {
        Some(id) => format!("{PREFIX}:list:children:{id}"),
        None => format!("{PREFIX}:list:children:root"),
    }
}

/// Cache key for the set of all folders.
pub fn all_folders() -> String {
    format!("{PREFIX}:list:folders")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_keys_share_prefix() {
        let prefix = listing_prefix();
        assert!(children(None).starts_with(&prefix));
        assert!(children(Some(NodeId::new())).starts_with(&prefix));
        assert!(all_folders().starts_with(&prefix));
        assert_ne!(children(None), children(Some(NodeId::new())));
    }
}
