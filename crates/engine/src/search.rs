//! Case-insensitive text/description filtering.
//!
//! Matching is applied to each item independently: a parent whose own text
//! does not match stays hidden even when one of its children matches.
//! Filtering only affects visibility; it never touches the tree, the expanded
//! ids or the active id.

use std::collections::HashSet;

use navtree_types::SidebarItem;

use crate::tree::ItemTree;

/// Whether `item` is visible under `query`.
pub fn matches(item: &SidebarItem, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    item.text.to_lowercase().contains(&needle) || item.description.to_lowercase().contains(&needle)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    query: String,
}

impl SearchFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Replace the query. Returns `false` when it was already set to `query`.
    pub fn set_query(&mut self, query: &str) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query.to_string();
        true
    }

    pub fn matches(&self, item: &SidebarItem) -> bool {
        matches(item, &self.query)
    }

    /// Ids hidden by the current query.
    pub fn hidden_ids(&self, tree: &ItemTree) -> HashSet<String> {
        if !self.is_active() {
            return HashSet::new();
        }
        tree.walk()
            .into_iter()
            .filter(|entry| !self.matches(entry.item))
            .map(|entry| entry.item.id.clone())
            .collect()
    }

    pub fn visible_count(&self, tree: &ItemTree) -> usize {
        tree.len() - self.hidden_ids(tree).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> SidebarItem {
        SidebarItem::new("users", "Users").with_description("User management")
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches(&item(), ""));
        assert!(matches(&SidebarItem::new("blank", ""), ""));
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(matches(&item(), "USER"), matches(&item(), "user"));
        assert!(matches(&item(), "MANAGE"));
        assert!(!matches(&item(), "settings"));
    }

    #[test]
    fn parents_are_not_kept_visible_by_matching_children() {
        let tree = ItemTree::from_items(vec![
            SidebarItem::new("admin", "Admin").with_children(vec![SidebarItem::new("audit", "Audit log")]),
        ])
        .unwrap();
        let filter = SearchFilter::new("audit");
        let hidden = filter.hidden_ids(&tree);
        assert!(hidden.contains("admin"));
        assert!(!hidden.contains("audit"));
        assert_eq!(filter.visible_count(&tree), 1);
    }
}
