//! Sidebar item model and derived capabilities.
//!
//! Items arrive from static declarations, JSON payloads (`data-source`,
//! `api-endpoint`) or programmatic `add_item` calls. The JSON shape accepted
//! here mirrors the widget's historical format where the identifier was named
//! `key`, so both `key` and `id` deserialize into [`SidebarItem::id`].

use serde::{Deserialize, Serialize};

/// Interaction behavior declared by the host for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemBehavior {
    /// Activates the item (navigation/selection) without revealing children.
    Clickable,
    /// Reveals or hides the item's children.
    Expandable,
    /// Starts expanded whenever the tree is built.
    AutoExpand,
}

impl ItemBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemBehavior::Clickable => "clickable",
            ItemBehavior::Expandable => "expandable",
            ItemBehavior::AutoExpand => "auto-expand",
        }
    }
}

/// One node of the sidebar's hierarchical menu.
///
/// Children are owned exclusively by their parent and keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarItem {
    /// Identifier, unique within the owning tree.
    #[serde(alias = "key")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
    /// Behavior explicitly declared by the host; absent unless provided.
    #[serde(default, rename = "behavior", skip_serializing_if = "Option::is_none")]
    pub declared_behavior: Option<ItemBehavior>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SidebarItem>,
}

impl SidebarItem {
    /// Creates an item with an id and display text and no declared behavior.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_behavior(mut self, behavior: ItemBehavior) -> Self {
        self.declared_behavior = Some(behavior);
        self
    }

    pub fn with_children(mut self, children: Vec<SidebarItem>) -> Self {
        self.children = children;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Partial update applied by `update_item`. `None` fields are left untouched.
///
/// `behavior` distinguishes "leave as is" (`None`) from "clear the
/// declaration" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub behavior: Option<Option<ItemBehavior>>,
    #[serde(default)]
    pub disabled: Option<bool>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.description.is_none()
            && self.icon.is_none()
            && self.behavior.is_none()
            && self.disabled.is_none()
    }

    /// Returns `true` when applying the patch can change the item's classification.
    pub fn touches_behavior(&self) -> bool {
        self.behavior.is_some()
    }
}

/// Capability classification of a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub has_children: bool,
    pub effective_behavior: ItemBehavior,
    pub is_expandable: bool,
    pub is_clickable: bool,
}

/// Envelope accepted for JSON item payloads: either a bare array or `{ "items": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemPayload {
    List(Vec<SidebarItem>),
    Wrapped { items: Vec<SidebarItem> },
}

impl ItemPayload {
    pub fn into_items(self) -> Vec<SidebarItem> {
        match self {
            ItemPayload::List(items) => items,
            ItemPayload::Wrapped { items } => items,
        }
    }
}

/// Items seeded when the host provides none.
pub fn default_items() -> Vec<SidebarItem> {
    vec![
        SidebarItem::new("dashboard", "Dashboard")
            .with_icon("◧")
            .with_description("System overview")
            .with_behavior(ItemBehavior::Clickable),
        SidebarItem::new("users", "Users")
            .with_icon("☺")
            .with_description("User management")
            .with_behavior(ItemBehavior::Expandable)
            .with_children(vec![
                SidebarItem::new("user-list", "User List")
                    .with_icon("≡")
                    .with_description("View all users")
                    .with_behavior(ItemBehavior::Clickable),
                SidebarItem::new("add-user", "Add User")
                    .with_icon("+")
                    .with_description("Create new user")
                    .with_behavior(ItemBehavior::Clickable),
            ]),
        SidebarItem::new("settings", "Settings")
            .with_icon("⚙")
            .with_description("System configuration")
            .with_behavior(ItemBehavior::Clickable),
    ]
}
