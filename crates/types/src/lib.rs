//! Shared type definitions for the navtree workspace.
//!
//! Everything here is plain data: the item model, host configuration, the
//! persisted snapshot, layout results, and the command/event vocabulary that
//! flows between the tree-state owner and its views.

pub mod config;
pub mod event;
pub mod item;
pub mod layout;
pub mod snapshot;

pub use config::{AttributeChange, ConfigError, DataSource, Position, SidebarConfig, ThemeName, parse_width};
pub use event::{SidebarCommand, SidebarEvent};
pub use item::{Capabilities, ItemBehavior, ItemPatch, ItemPayload, SidebarItem, default_items};
pub use layout::{LayoutInfo, MOBILE_BREAKPOINT, RegionMargins};
pub use snapshot::Snapshot;
