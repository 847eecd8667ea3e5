//! # Navtree Engine
//!
//! The navtree engine owns the state model of a navigation sidebar: a tree of
//! nested items, each tracking expansion, activation and search visibility,
//! synchronized with persisted state, attribute-driven configuration and the
//! layout of the regions next to it.
//!
//! ## Usage
//!
//! ```rust
//! use navtree_engine::Sidebar;
//! use navtree_types::{SidebarCommand, SidebarConfig, SidebarEvent};
//!
//! let mut sidebar = Sidebar::new(SidebarConfig::default());
//! sidebar.attach();
//!
//! let events = sidebar.handle(SidebarCommand::Click("users".into()));
//! assert!(sidebar.is_expanded("users"));
//! assert!(matches!(events[0], SidebarEvent::ItemExpansion { expanded: true, .. }));
//! ```
//!
//! ## Architecture
//!
//! - **`capability`**: pure classification of an item into expandable / clickable
//! - **`tree`**: the owned item tree and its capability index
//! - **`expansion`**, **`active`**, **`search`**: tree-level state
//! - **`layout`**: margins for adjacent regions, breakpoint and resize debouncing
//! - **`sidebar`**: the state owner and command dispatch
//! - **`view`**: projection into render-ready rows
//! - **`data_source`** / **`refresh`**: item loading and serialized refreshes

pub mod active;
pub mod capability;
pub mod data_source;
pub mod error;
pub mod expansion;
pub mod layout;
pub mod refresh;
pub mod search;
pub mod sidebar;
pub mod tree;
pub mod view;

pub use active::ActiveItemTracker;
pub use capability::{classify, classify_item};
pub use data_source::{RemoteItemSource, parse_items};
pub use error::{DataSourceError, TreeError};
pub use expansion::{ExpansionChange, ExpansionStore};
pub use layout::{AppliedLayout, DEFAULT_RESIZE_DEBOUNCE, LayoutInput, LayoutReconciler, ResizeDebouncer, compute_layout};
pub use refresh::{RefreshCoordinator, RefreshOrigin, RefreshOutcome};
pub use search::{SearchFilter, matches};
pub use sidebar::{RenderScope, Sidebar, SidebarEffect};
pub use tree::{ItemTree, TreeEntry};
pub use view::{ViewRow, ViewState};
