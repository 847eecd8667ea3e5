//! Item capability analysis.
//!
//! Classification is a pure function of the number of live children and the
//! declared behavior. It never inspects anything else, so callers refresh it
//! whenever children are inserted/removed or the declaration changes.

use navtree_types::{Capabilities, ItemBehavior, SidebarItem};

/// Classify an item from its child count and declared behavior.
pub fn classify(child_count: usize, declared: Option<ItemBehavior>) -> Capabilities {
    let has_children = child_count > 0;
    let effective_behavior = declared.unwrap_or(if has_children {
        ItemBehavior::Expandable
    } else {
        ItemBehavior::Clickable
    });
    let is_expandable = has_children || effective_behavior == ItemBehavior::Expandable;
    let is_clickable = effective_behavior == ItemBehavior::Clickable
        || (!has_children && effective_behavior != ItemBehavior::Expandable);

    Capabilities {
        has_children,
        effective_behavior,
        is_expandable,
        is_clickable,
    }
}

/// Convenience wrapper over [`classify`] for a whole item.
pub fn classify_item(item: &SidebarItem) -> Capabilities {
    classify(item.children.len(), item.declared_behavior)
}
