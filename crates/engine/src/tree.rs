//! Owned item tree with a capability index.
//!
//! The tree owns every [`SidebarItem`]; children belong to exactly one parent.
//! Capabilities are not stored on the items. They live in an index that is
//! rebuilt by [`ItemTree::refresh_capabilities`] after every structural
//! mutation, which is the "attribute refresh" half of rendering: it never
//! touches the view, it only recomputes what each item can do.

use std::collections::HashSet;

use indexmap::IndexMap;
use navtree_types::{Capabilities, ItemBehavior, ItemPatch, SidebarItem};

use crate::capability::classify_item;
use crate::error::TreeError;

/// One item visited during a depth-first walk.
#[derive(Debug, Clone, Copy)]
pub struct TreeEntry<'a> {
    pub item: &'a SidebarItem,
    pub depth: usize,
    pub parent_id: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemTree {
    roots: Vec<SidebarItem>,
    /// Capabilities keyed by id, in depth-first order.
    capabilities: IndexMap<String, Capabilities>,
}

impl ItemTree {
    /// Build a tree, rejecting duplicate or empty ids.
    pub fn from_items(items: Vec<SidebarItem>) -> Result<Self, TreeError> {
        let mut seen = HashSet::new();
        collect_ids(&items, &mut seen)?;
        let mut tree = Self {
            roots: items,
            capabilities: IndexMap::new(),
        };
        tree.refresh_capabilities();
        Ok(tree)
    }

    pub fn roots(&self) -> &[SidebarItem] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of items at every depth.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.capabilities.contains_key(id)
    }

    pub fn find(&self, id: &str) -> Option<&SidebarItem> {
        find_in(&self.roots, id)
    }

    pub fn capabilities(&self, id: &str) -> Option<Capabilities> {
        self.capabilities.get(id).copied()
    }

    /// Recompute the capability index from the current structure.
    ///
    /// Returns the ids whose classification changed (including new ids).
    pub fn refresh_capabilities(&mut self) -> Vec<String> {
        let mut next = IndexMap::with_capacity(self.capabilities.len());
        for entry in walk(&self.roots) {
            next.insert(entry.item.id.clone(), classify_item(entry.item));
        }
        let changed = next
            .iter()
            .filter(|(id, caps)| self.capabilities.get(*id) != Some(*caps))
            .map(|(id, _)| id.clone())
            .collect();
        self.capabilities = next;
        changed
    }

    /// Depth-first walk over every item.
    pub fn walk(&self) -> Vec<TreeEntry<'_>> {
        walk(&self.roots)
    }

    /// Ids of every item that currently has children, at any depth.
    pub fn ids_with_children(&self) -> Vec<String> {
        self.capabilities
            .iter()
            .filter(|(_, caps)| caps.has_children)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Ids of items declared `auto-expand`.
    pub fn auto_expand_ids(&self) -> Vec<String> {
        walk(&self.roots)
            .into_iter()
            .filter(|entry| entry.item.declared_behavior == Some(ItemBehavior::AutoExpand))
            .map(|entry| entry.item.id.clone())
            .collect()
    }

    /// Insert `item` (with its subtree) under `parent_id`, or at the root.
    pub fn add_item(&mut self, item: SidebarItem, parent_id: Option<&str>) -> Result<(), TreeError> {
        let mut incoming = HashSet::new();
        collect_ids(std::slice::from_ref(&item), &mut incoming)?;
        if let Some(duplicate) = incoming.iter().find(|id| self.contains(id)) {
            return Err(TreeError::DuplicateId(duplicate.clone()));
        }

        match parent_id {
            None => self.roots.push(item),
            Some(parent_id) => {
                let parent = find_in_mut(&mut self.roots, parent_id)
                    .ok_or_else(|| TreeError::UnknownParent(parent_id.to_string()))?;
                parent.children.push(item);
            }
        }
        self.refresh_capabilities();
        Ok(())
    }

    /// Detach an item and its subtree.
    pub fn remove_item(&mut self, id: &str) -> Result<SidebarItem, TreeError> {
        let removed = remove_from(&mut self.roots, id).ok_or_else(|| TreeError::UnknownItem(id.to_string()))?;
        self.refresh_capabilities();
        Ok(removed)
    }

    /// Apply a partial update. Returns `true` when the item's classification changed.
    pub fn update_item(&mut self, id: &str, patch: &ItemPatch) -> Result<bool, TreeError> {
        let item = find_in_mut(&mut self.roots, id).ok_or_else(|| TreeError::UnknownItem(id.to_string()))?;
        if let Some(text) = &patch.text {
            item.text = text.clone();
        }
        if let Some(description) = &patch.description {
            item.description = description.clone();
        }
        if let Some(icon) = &patch.icon {
            item.icon = icon.clone();
        }
        if let Some(behavior) = patch.behavior {
            item.declared_behavior = behavior;
        }
        if let Some(disabled) = patch.disabled {
            item.disabled = disabled;
        }
        if !patch.touches_behavior() {
            return Ok(false);
        }
        let changed = self.refresh_capabilities();
        Ok(changed.iter().any(|changed_id| changed_id == id))
    }

    /// Replace every item at once.
    pub fn replace(&mut self, items: Vec<SidebarItem>) -> Result<(), TreeError> {
        *self = Self::from_items(items)?;
        Ok(())
    }

    /// Ids of every item in the subtree rooted at `id`, including `id` itself.
    pub fn subtree_ids(&self, id: &str) -> Vec<String> {
        self.find(id)
            .map(|item| walk(std::slice::from_ref(item)).into_iter().map(|entry| entry.item.id.clone()).collect())
            .unwrap_or_default()
    }
}

fn collect_ids(items: &[SidebarItem], seen: &mut HashSet<String>) -> Result<(), TreeError> {
    for item in items {
        if item.id.trim().is_empty() {
            return Err(TreeError::EmptyId);
        }
        if !seen.insert(item.id.clone()) {
            return Err(TreeError::DuplicateId(item.id.clone()));
        }
        collect_ids(&item.children, seen)?;
    }
    Ok(())
}

fn walk(items: &[SidebarItem]) -> Vec<TreeEntry<'_>> {
    fn visit<'a>(items: &'a [SidebarItem], depth: usize, parent_id: Option<&'a str>, out: &mut Vec<TreeEntry<'a>>) {
        for item in items {
            out.push(TreeEntry { item, depth, parent_id });
            visit(&item.children, depth + 1, Some(item.id.as_str()), out);
        }
    }
    let mut out = Vec::new();
    visit(items, 0, None, &mut out);
    out
}

fn find_in<'a>(items: &'a [SidebarItem], id: &str) -> Option<&'a SidebarItem> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_in(&item.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(items: &'a mut [SidebarItem], id: &str) -> Option<&'a mut SidebarItem> {
    for item in items.iter_mut() {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_in_mut(&mut item.children, id) {
            return Some(found);
        }
    }
    None
}

fn remove_from(items: &mut Vec<SidebarItem>, id: &str) -> Option<SidebarItem> {
    if let Some(position) = items.iter().position(|item| item.id == id) {
        return Some(items.remove(position));
    }
    items.iter_mut().find_map(|item| remove_from(&mut item.children, id))
}
