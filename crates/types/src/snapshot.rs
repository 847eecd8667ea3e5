//! Persisted subset of tree-level state.
//!
//! The serialized field names match the blob the widget has always written:
//! `{ "collapsed": bool, "searchQuery": string, "expandedItems": [string] }`.
//! The active item is intentionally absent; only collapse, search and
//! expansion survive a reload.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub expanded_items: Vec<String>,
}
