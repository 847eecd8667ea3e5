//! Notifications emitted by a sidebar and the commands it accepts.
//!
//! Views never reach into the tree state directly: they send a
//! [`SidebarCommand`] to the owner, which mutates state first and then
//! returns the resulting [`SidebarEvent`]s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::{ItemBehavior, ItemPatch, SidebarItem};
use crate::layout::LayoutInfo;

/// Observable notification bubbling to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SidebarEvent {
    /// An enabled item was clicked.
    ItemClick {
        id: String,
        text: String,
        behavior: ItemBehavior,
    },
    /// An item's expansion state changed.
    ItemExpansion { id: String, expanded: bool },
    /// The active item changed.
    ActiveChanged { previous: Option<String>, current: Option<String> },
    /// Whole-sidebar collapse toggled.
    Toggle { collapsed: bool },
    /// Mobile drawer opened or closed.
    MobileToggle { open: bool },
    /// Search query changed.
    SearchChanged { query: String, visible_count: usize },
    /// Layout was applied to adjacent regions.
    LayoutChanged(LayoutInfo),
    /// Items were replaced from a data source. Carries the loaded items.
    DataRefreshed {
        items: Vec<SidebarItem>,
        timestamp: DateTime<Utc>,
    },
    /// Loading or parsing item data failed.
    DataError { message: String },
}

impl SidebarEvent {
    /// Short event name, matching the DOM event names of the widget.
    pub fn name(&self) -> &'static str {
        match self {
            SidebarEvent::ItemClick { .. } => "item-click",
            SidebarEvent::ItemExpansion { .. } => "item-expansion",
            SidebarEvent::ActiveChanged { .. } => "active-changed",
            SidebarEvent::Toggle { .. } => "toggle",
            SidebarEvent::MobileToggle { .. } => "mobile-toggle",
            SidebarEvent::SearchChanged { .. } => "search-changed",
            SidebarEvent::LayoutChanged(_) => "layout-changed",
            SidebarEvent::DataRefreshed { .. } => "data-refreshed",
            SidebarEvent::DataError { .. } => "data-error",
        }
    }
}

/// Typed request sent to the tree-state owner.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarCommand {
    /// Click on an item: toggles when it has live children, otherwise activates.
    Click(String),
    RequestExpand(String),
    RequestCollapse(String),
    RequestToggle(String),
    RequestActivate(String),
    /// Pick an entry of the collapsed-mode flyout.
    FlyoutPick(String),
    Search(String),
    ToggleCollapse,
    OpenMobile,
    CloseMobile,
    /// Escape pressed while the sidebar has focus.
    Escape,
    /// Click outside the drawer (on the overlay).
    OutsideClick,
    ExpandAll,
    CollapseAll,
    AddItem {
        item: SidebarItem,
        parent_id: Option<String>,
    },
    RemoveItem(String),
    UpdateItem {
        id: String,
        patch: ItemPatch,
    },
    SetAttribute {
        name: String,
        value: Option<String>,
    },
    /// Viewport width after debouncing.
    Viewport(u16),
    /// Register an adjacent region by name.
    RegisterRegion(String),
}
