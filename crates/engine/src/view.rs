//! Projection of tree state into flat, render-ready rows.

use navtree_types::{ItemBehavior, SidebarItem};
use serde::Serialize;

use crate::expansion::ExpansionStore;
use crate::search::SearchFilter;
use crate::tree::ItemTree;

/// One visible line of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    pub id: String,
    pub text: String,
    pub description: String,
    pub icon: String,
    pub depth: usize,
    pub behavior: ItemBehavior,
    pub has_children: bool,
    pub is_expandable: bool,
    pub is_clickable: bool,
    pub expanded: bool,
    pub active: bool,
    pub disabled: bool,
}

/// Borrowed inputs of a projection.
#[derive(Debug, Clone, Copy)]
pub struct ViewState<'a> {
    pub tree: &'a ItemTree,
    pub expansion: &'a ExpansionStore,
    pub active_id: Option<&'a str>,
    pub search: &'a SearchFilter,
}

/// Rows visible under the current expansion and search state.
///
/// An item is shown when it matches the query and every ancestor is both
/// shown and expanded. A hidden item hides its whole subtree.
pub fn project(state: ViewState<'_>) -> Vec<ViewRow> {
    let mut rows = Vec::new();
    visit(state, state.tree.roots(), 0, &mut rows);
    rows
}

fn visit(state: ViewState<'_>, items: &[SidebarItem], depth: usize, rows: &mut Vec<ViewRow>) {
    for item in items {
        if !state.search.matches(item) {
            continue;
        }
        let row = row_for(state, item, depth);
        let descend = row.expanded && row.has_children;
        rows.push(row);
        if descend {
            visit(state, &item.children, depth + 1, rows);
        }
    }
}

/// Direct children of `id`, listed as the collapsed-mode flyout.
pub fn flyout(state: ViewState<'_>, id: &str) -> Vec<ViewRow> {
    state
        .tree
        .find(id)
        .map(|item| item.children.iter().map(|child| row_for(state, child, 0)).collect())
        .unwrap_or_default()
}

fn row_for(state: ViewState<'_>, item: &SidebarItem, depth: usize) -> ViewRow {
    let caps = state
        .tree
        .capabilities(&item.id)
        .unwrap_or_else(|| crate::capability::classify_item(item));
    ViewRow {
        id: item.id.clone(),
        text: item.text.clone(),
        description: item.description.clone(),
        icon: item.icon.clone(),
        depth,
        behavior: caps.effective_behavior,
        has_children: caps.has_children,
        is_expandable: caps.is_expandable,
        is_clickable: caps.is_clickable,
        expanded: state.expansion.is_expanded(&item.id),
        active: state.active_id == Some(item.id.as_str()),
        disabled: item.disabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> ItemTree {
        ItemTree::from_items(vec![
            SidebarItem::new("a", "Alpha"),
            SidebarItem::new("b", "Beta").with_children(vec![
                SidebarItem::new("b1", "Beta One"),
                SidebarItem::new("b2", "Other"),
            ]),
        ])
        .unwrap()
    }

    fn ids(rows: &[ViewRow]) -> Vec<&str> {
        rows.iter().map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn collapsed_parents_hide_children() {
        let tree = tree();
        let expansion = ExpansionStore::new();
        let search = SearchFilter::default();
        let rows = project(ViewState {
            tree: &tree,
            expansion: &expansion,
            active_id: Some("a"),
            search: &search,
        });
        assert_eq!(ids(&rows), vec!["a", "b"]);
        assert!(rows[0].active);
        assert!(rows[1].is_expandable);
    }

    #[test]
    fn expanded_parents_show_children_one_level_deeper() {
        let tree = tree();
        let expansion = ExpansionStore::from_ids(["b"]);
        let search = SearchFilter::default();
        let rows = project(ViewState {
            tree: &tree,
            expansion: &expansion,
            active_id: None,
            search: &search,
        });
        assert_eq!(ids(&rows), vec!["a", "b", "b1", "b2"]);
        assert_eq!(rows[2].depth, 1);
    }

    #[test]
    fn search_hides_non_matching_items_and_their_subtrees() {
        let tree = tree();
        let expansion = ExpansionStore::from_ids(["b"]);
        let search = SearchFilter::new("beta");
        let rows = project(ViewState {
            tree: &tree,
            expansion: &expansion,
            active_id: None,
            search: &search,
        });
        assert_eq!(ids(&rows), vec!["b", "b1"]);

        let hidden_parent = SearchFilter::new("other");
        let rows = project(ViewState {
            tree: &tree,
            expansion: &expansion,
            active_id: None,
            search: &hidden_parent,
        });
        assert!(rows.is_empty());
    }

    #[test]
    fn flyout_lists_direct_children() {
        let tree = tree();
        let expansion = ExpansionStore::new();
        let search = SearchFilter::default();
        let state = ViewState {
            tree: &tree,
            expansion: &expansion,
            active_id: Some("b2"),
            search: &search,
        };
        let rows = flyout(state, "b");
        assert_eq!(ids(&rows), vec!["b1", "b2"]);
        assert!(rows[1].active);
        assert!(flyout(state, "a").is_empty());
    }
}
