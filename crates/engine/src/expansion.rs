//! Expanded-item bookkeeping.
//!
//! Ids are kept in insertion order so the persisted `expandedItems` list is
//! stable across saves. Ids need not refer to expandable (or even existing)
//! items; stale ids are harmless and survive re-classification.

use indexmap::IndexSet;

use crate::tree::ItemTree;

/// An effective change of one item's expansion state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionChange {
    pub id: String,
    pub expanded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionStore {
    expanded: IndexSet<String>,
}

impl ExpansionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expanded: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: &str) -> Option<ExpansionChange> {
        self.expanded.insert(id.to_string()).then(|| ExpansionChange {
            id: id.to_string(),
            expanded: true,
        })
    }

    pub fn collapse(&mut self, id: &str) -> Option<ExpansionChange> {
        self.expanded.shift_remove(id).then(|| ExpansionChange {
            id: id.to_string(),
            expanded: false,
        })
    }

    /// Flip membership. Always produces a change.
    pub fn toggle(&mut self, id: &str) -> ExpansionChange {
        if self.expanded.shift_remove(id) {
            ExpansionChange {
                id: id.to_string(),
                expanded: false,
            }
        } else {
            self.expanded.insert(id.to_string());
            ExpansionChange {
                id: id.to_string(),
                expanded: true,
            }
        }
    }

    /// Expand every item of `tree` that has children, at any depth.
    pub fn expand_all(&mut self, tree: &ItemTree) -> Vec<ExpansionChange> {
        tree.ids_with_children().iter().filter_map(|id| self.expand(id)).collect()
    }

    /// Clear every expanded id, including stale ones.
    pub fn collapse_all(&mut self) -> Vec<ExpansionChange> {
        self.expanded
            .drain(..)
            .map(|id| ExpansionChange { id, expanded: false })
            .collect()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.expanded.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navtree_types::SidebarItem;

    fn nested_tree() -> ItemTree {
        ItemTree::from_items(vec![
            SidebarItem::new("a", "A"),
            SidebarItem::new("b", "B").with_children(vec![
                SidebarItem::new("b1", "B1").with_children(vec![SidebarItem::new("b1x", "B1X")]),
                SidebarItem::new("b2", "B2"),
            ]),
        ])
        .unwrap()
    }

    #[test]
    fn expand_and_collapse_are_idempotent() {
        let mut store = ExpansionStore::new();
        assert!(store.expand("b").is_some());
        assert!(store.expand("b").is_none());
        assert!(store.is_expanded("b"));
        assert!(store.collapse("b").is_some());
        assert!(store.collapse("b").is_none());
        assert!(store.collapse("unknown").is_none());
    }

    #[test]
    fn toggle_inverts_membership() {
        let mut store = ExpansionStore::new();
        assert!(store.toggle("b").expanded);
        assert!(!store.toggle("b").expanded);
        assert!(store.is_empty());
    }

    #[test]
    fn expand_all_covers_nested_parents_only() {
        let mut store = ExpansionStore::new();
        let changes = store.expand_all(&nested_tree());
        assert_eq!(changes.len(), 2);
        assert_eq!(store.to_vec(), vec!["b".to_string(), "b1".to_string()]);
        assert!(!store.is_expanded("a"));
    }

    #[test]
    fn expand_all_then_collapse_all_is_empty_regardless_of_prior_state() {
        let mut store = ExpansionStore::from_ids(["stale", "b"]);
        store.expand_all(&nested_tree());
        let changes = store.collapse_all();
        assert_eq!(changes.len(), 3);
        assert!(store.is_empty());
    }
}
