//! The tree-state owner.
//!
//! [`Sidebar`] holds every piece of tree-level state for one instance and is
//! the only place that mutates it. Views talk to it through
//! [`SidebarCommand`]s (or the equivalent methods) and receive the resulting
//! [`SidebarEvent`]s, always produced after the state has been updated.
//!
//! Work the owner cannot do synchronously (fetching remote items, restarting
//! the polling timer) is queued as [`SidebarEffect`]s for the runtime to drain.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use navtree_types::{
    AttributeChange, ConfigError, DataSource, ItemPatch, LayoutInfo, SidebarCommand, SidebarConfig, SidebarEvent,
    SidebarItem, Snapshot, default_items,
};
use navtree_util::StateStore;
use tracing::{debug, info, warn};
use url::Url;

use crate::active::ActiveItemTracker;
use crate::capability::classify_item;
use crate::data_source::parse_items;
use crate::error::{DataSourceError, TreeError};
use crate::expansion::{ExpansionChange, ExpansionStore};
use crate::layout::{LayoutInput, LayoutReconciler, compute_layout};
use crate::search::SearchFilter;
use crate::tree::ItemTree;
use crate::view::{self, ViewRow, ViewState};

/// Kind of render a mutation requires. Ordered so the wider scope wins when merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderScope {
    #[default]
    Clean,
    /// Capability flags and state classes changed; rows can be patched in place.
    Attributes,
    /// Structure or presentation changed; the view must be rebuilt.
    Structure,
}

/// Asynchronous work requested by the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEffect {
    /// Fetch the item document at this URL and hand the result to [`Sidebar::apply_refresh`].
    FetchItems(Url),
    /// The polling endpoint or interval changed; restart (or stop) the timer.
    RestartPolling,
}

pub struct Sidebar {
    config: SidebarConfig,
    tree: ItemTree,
    expansion: ExpansionStore,
    active: ActiveItemTracker,
    search: SearchFilter,
    collapsed: bool,
    mobile_open: bool,
    loading: bool,
    layout: LayoutReconciler,
    viewport_width: Option<u16>,
    store: Option<Arc<dyn StateStore>>,
    attached: bool,
    render: RenderScope,
    effects: Vec<SidebarEffect>,
}

impl fmt::Debug for Sidebar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sidebar")
            .field("config", &self.config)
            .field("items", &self.tree.len())
            .field("expanded", &self.expansion)
            .field("active", &self.active.active())
            .field("search", &self.search.query())
            .field("collapsed", &self.collapsed)
            .field("mobile_open", &self.mobile_open)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

impl Sidebar {
    pub fn new(config: SidebarConfig) -> Self {
        let layout = LayoutReconciler::new(config.auto_layout);
        Self {
            config,
            tree: ItemTree::default(),
            expansion: ExpansionStore::new(),
            active: ActiveItemTracker::new(),
            search: SearchFilter::default(),
            collapsed: false,
            mobile_open: false,
            loading: false,
            layout,
            viewport_width: None,
            store: None,
            attached: false,
            render: RenderScope::Structure,
            effects: Vec::new(),
        }
    }

    /// Persistence backend consulted when `remember-state` is set.
    pub fn with_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Seed items before attaching (static declarations).
    pub fn with_items(mut self, items: Vec<SidebarItem>) -> Result<Self, TreeError> {
        self.tree = ItemTree::from_items(items)?;
        Ok(self)
    }

    // ---- lifecycle ----

    /// Connect the sidebar: restore saved state, load items and apply layout.
    pub fn attach(&mut self) -> Vec<SidebarEvent> {
        let mut events = Vec::new();
        self.attached = true;
        self.mobile_open = false;
        self.restore();
        self.load_configured_items(&mut events);
        if self.config.polling().is_some() {
            self.effects.push(SidebarEffect::RestartPolling);
        }
        self.reconcile_layout(&mut events);
        self.mark(RenderScope::Structure);
        info!(key = %self.config.state_key(), items = self.tree.len(), "sidebar attached");
        events
    }

    /// Disconnect the sidebar, saving its state one last time.
    pub fn detach(&mut self) {
        self.persist();
        self.attached = false;
        self.effects.clear();
        debug!(key = %self.config.state_key(), "sidebar detached");
    }

    fn restore(&mut self) {
        if !self.config.remember_state {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };
        let key = self.config.state_key();
        match store.load(&key) {
            Ok(Some(snapshot)) => {
                debug!(key = %key, expanded = snapshot.expanded_items.len(), "restored sidebar state");
                self.collapsed = snapshot.collapsed;
                self.search = SearchFilter::new(snapshot.search_query);
                self.expansion = ExpansionStore::from_ids(snapshot.expanded_items);
            }
            Ok(None) => debug!(key = %key, "no saved sidebar state"),
            Err(error) => warn!(key = %key, error = %error, "Failed to load sidebar state; using defaults"),
        }
    }

    fn persist(&self) {
        if !self.attached || !self.config.remember_state {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };
        let key = self.config.state_key();
        if let Err(error) = store.save(&key, &self.snapshot()) {
            warn!(key = %key, error = %error, "Failed to save sidebar state");
        }
    }

    /// Persisted subset of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            collapsed: self.collapsed,
            search_query: self.search.query().to_string(),
            expanded_items: self.expansion.to_vec(),
        }
    }

    // ---- item data ----

    fn load_configured_items(&mut self, events: &mut Vec<SidebarEvent>) {
        match self.config.data_source.clone() {
            None => {
                if self.tree.is_empty() {
                    match ItemTree::from_items(default_items()) {
                        Ok(tree) => self.tree = tree,
                        Err(error) => warn!(error = %error, "default sidebar items are invalid"),
                    }
                    self.apply_auto_expand(events);
                }
            }
            Some(DataSource::Inline(json)) => match parse_items(&json) {
                Ok(items) => self.replace_items(items, events),
                Err(error) => {
                    self.tree = ItemTree::default();
                    self.mark(RenderScope::Structure);
                    self.report_data_error(&error, events);
                }
            },
            Some(DataSource::Remote(url)) => {
                self.loading = true;
                self.effects.push(SidebarEffect::FetchItems(url));
            }
        }
    }

    /// Apply the outcome of a fetch. Failures keep the last-known-good tree.
    pub fn apply_refresh(&mut self, result: Result<Vec<SidebarItem>, DataSourceError>) -> Vec<SidebarEvent> {
        let mut events = Vec::new();
        self.loading = false;
        match result {
            Ok(items) => self.replace_items(items, &mut events),
            Err(error) => self.report_data_error(&error, &mut events),
        }
        events
    }

    fn replace_items(&mut self, items: Vec<SidebarItem>, events: &mut Vec<SidebarEvent>) {
        if let Err(error) = self.tree.replace(items) {
            self.report_data_error(&DataSourceError::from(error), events);
            return;
        }
        self.apply_auto_expand(events);
        self.mark(RenderScope::Structure);
        self.persist();
        info!(items = self.tree.len(), "sidebar items refreshed");
        events.push(SidebarEvent::DataRefreshed {
            items: self.tree.roots().to_vec(),
            timestamp: Utc::now(),
        });
    }

    fn report_data_error(&mut self, error: &DataSourceError, events: &mut Vec<SidebarEvent>) {
        warn!(error = %error, "Failed to load sidebar items");
        events.push(SidebarEvent::DataError {
            message: error.to_string(),
        });
    }

    fn apply_auto_expand(&mut self, events: &mut Vec<SidebarEvent>) {
        for id in self.tree.auto_expand_ids() {
            if let Some(change) = self.expansion.expand(&id) {
                events.push(expansion_event(change));
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mark a refresh as started by the runtime (polling ticks).
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Drain queued asynchronous work.
    pub fn take_effects(&mut self) -> Vec<SidebarEffect> {
        std::mem::take(&mut self.effects)
    }

    // ---- command dispatch ----

    /// Handle one command. Failures are logged and produce no events.
    pub fn handle(&mut self, command: SidebarCommand) -> Vec<SidebarEvent> {
        match command {
            SidebarCommand::Click(id) => self.click(&id),
            SidebarCommand::RequestExpand(id) => self.expand(&id),
            SidebarCommand::RequestCollapse(id) => self.collapse(&id),
            SidebarCommand::RequestToggle(id) => self.toggle_item(&id),
            SidebarCommand::RequestActivate(id) => self.set_active_item(&id),
            SidebarCommand::FlyoutPick(id) => self.flyout_pick(&id),
            SidebarCommand::Search(query) => self.search(&query),
            SidebarCommand::ToggleCollapse => self.toggle_collapse(),
            SidebarCommand::OpenMobile => self.open_mobile(),
            SidebarCommand::CloseMobile | SidebarCommand::Escape | SidebarCommand::OutsideClick => {
                self.close_mobile()
            }
            SidebarCommand::ExpandAll => self.expand_all(),
            SidebarCommand::CollapseAll => self.collapse_all(),
            SidebarCommand::AddItem { item, parent_id } => {
                let id = item.id.clone();
                self.add_item(item, parent_id.as_deref()).unwrap_or_else(|error| {
                    warn!(id = %id, error = %error, "add_item rejected");
                    Vec::new()
                })
            }
            SidebarCommand::RemoveItem(id) => self.remove_item(&id).unwrap_or_else(|error| {
                warn!(id = %id, error = %error, "remove_item rejected");
                Vec::new()
            }),
            SidebarCommand::UpdateItem { id, patch } => self.update_item(&id, &patch).unwrap_or_else(|error| {
                warn!(id = %id, error = %error, "update_item rejected");
                Vec::new()
            }),
            SidebarCommand::SetAttribute { name, value } => {
                self.set_attribute(&name, value.as_deref()).unwrap_or_else(|error| {
                    warn!(attribute = %name, error = %error, "ignoring invalid sidebar attribute");
                    Vec::new()
                })
            }
            SidebarCommand::Viewport(width) => self.set_viewport(width),
            SidebarCommand::RegisterRegion(name) => self.register_region(name),
        }
    }

    /// Click semantics: expand wins over activate whenever the item has live
    /// children. Disabled items ignore clicks entirely.
    pub fn click(&mut self, id: &str) -> Vec<SidebarEvent> {
        let Some(item) = self.tree.find(id) else {
            debug!(id, "click on unknown item ignored");
            return Vec::new();
        };
        if item.disabled {
            debug!(id, "click on disabled item ignored");
            return Vec::new();
        }
        let text = item.text.clone();
        let caps = self.tree.capabilities(id).unwrap_or_else(|| classify_item(item));

        let mut events = Vec::new();
        if caps.is_expandable && caps.has_children {
            let change = self.expansion.toggle(id);
            self.mark(RenderScope::Attributes);
            self.persist();
            events.push(expansion_event(change));
        } else if caps.is_clickable {
            self.activate(id, &mut events);
        }
        events.push(SidebarEvent::ItemClick {
            id: id.to_string(),
            text,
            behavior: caps.effective_behavior,
        });
        events
    }

    fn activate(&mut self, id: &str, events: &mut Vec<SidebarEvent>) {
        if let Some(previous) = self.active.set_active(id) {
            self.mark(RenderScope::Attributes);
            events.push(SidebarEvent::ActiveChanged {
                previous,
                current: Some(id.to_string()),
            });
        }
    }

    /// Make `id` the active item. Unknown ids are ignored.
    pub fn set_active_item(&mut self, id: &str) -> Vec<SidebarEvent> {
        if !self.tree.contains(id) {
            debug!(id, "set_active_item on unknown item ignored");
            return Vec::new();
        }
        let mut events = Vec::new();
        self.activate(id, &mut events);
        events
    }

    pub fn expand(&mut self, id: &str) -> Vec<SidebarEvent> {
        let change = self.expansion.expand(id);
        self.expansion_changed(change.into_iter().collect())
    }

    pub fn collapse(&mut self, id: &str) -> Vec<SidebarEvent> {
        let change = self.expansion.collapse(id);
        self.expansion_changed(change.into_iter().collect())
    }

    pub fn toggle_item(&mut self, id: &str) -> Vec<SidebarEvent> {
        let change = self.expansion.toggle(id);
        self.expansion_changed(vec![change])
    }

    pub fn expand_all(&mut self) -> Vec<SidebarEvent> {
        let changes = self.expansion.expand_all(&self.tree);
        self.expansion_changed(changes)
    }

    pub fn collapse_all(&mut self) -> Vec<SidebarEvent> {
        let changes = self.expansion.collapse_all();
        self.expansion_changed(changes)
    }

    fn expansion_changed(&mut self, changes: Vec<ExpansionChange>) -> Vec<SidebarEvent> {
        if changes.is_empty() {
            return Vec::new();
        }
        self.mark(RenderScope::Attributes);
        self.persist();
        changes.into_iter().map(expansion_event).collect()
    }

    /// Entries of the collapsed-mode flyout for `id`.
    pub fn flyout_entries(&self, id: &str) -> Vec<ViewRow> {
        view::flyout(self.view_state(), id)
    }

    /// Pick a flyout entry: activates it when clickable and reports the click.
    pub fn flyout_pick(&mut self, id: &str) -> Vec<SidebarEvent> {
        let Some(item) = self.tree.find(id) else {
            return Vec::new();
        };
        if item.disabled {
            return Vec::new();
        }
        let text = item.text.clone();
        let caps = self.tree.capabilities(id).unwrap_or_else(|| classify_item(item));
        let mut events = Vec::new();
        if caps.is_clickable {
            self.activate(id, &mut events);
        }
        events.push(SidebarEvent::ItemClick {
            id: id.to_string(),
            text,
            behavior: caps.effective_behavior,
        });
        events
    }

    pub fn search(&mut self, query: &str) -> Vec<SidebarEvent> {
        if !self.search.set_query(query) {
            return Vec::new();
        }
        self.mark(RenderScope::Attributes);
        self.persist();
        vec![SidebarEvent::SearchChanged {
            query: query.to_string(),
            visible_count: self.search.visible_count(&self.tree),
        }]
    }

    // ---- whole-sidebar visibility ----

    pub fn toggle_collapse(&mut self) -> Vec<SidebarEvent> {
        self.collapsed = !self.collapsed;
        self.mark(RenderScope::Structure);
        self.persist();
        let mut events = vec![SidebarEvent::Toggle {
            collapsed: self.collapsed,
        }];
        self.reconcile_layout(&mut events);
        events
    }

    pub fn open_mobile(&mut self) -> Vec<SidebarEvent> {
        if self.mobile_open {
            return Vec::new();
        }
        self.mobile_open = true;
        self.mark(RenderScope::Attributes);
        vec![SidebarEvent::MobileToggle { open: true }]
    }

    pub fn close_mobile(&mut self) -> Vec<SidebarEvent> {
        if !self.mobile_open {
            return Vec::new();
        }
        self.mobile_open = false;
        self.mark(RenderScope::Attributes);
        vec![SidebarEvent::MobileToggle { open: false }]
    }

    // ---- structural mutations ----

    pub fn add_item(&mut self, item: SidebarItem, parent_id: Option<&str>) -> Result<Vec<SidebarEvent>, TreeError> {
        let auto_expand = item.declared_behavior == Some(navtree_types::ItemBehavior::AutoExpand);
        let id = item.id.clone();
        self.tree.add_item(item, parent_id)?;
        let mut events = Vec::new();
        if auto_expand && let Some(change) = self.expansion.expand(&id) {
            events.push(expansion_event(change));
        }
        self.mark(RenderScope::Structure);
        self.persist();
        Ok(events)
    }

    /// Remove an item and its subtree. The active id is cleared when it was
    /// inside the removed subtree; expanded ids are left as they are.
    pub fn remove_item(&mut self, id: &str) -> Result<Vec<SidebarEvent>, TreeError> {
        let removed_ids = self.tree.subtree_ids(id);
        self.tree.remove_item(id)?;
        let mut events = Vec::new();
        if let Some(active) = self.active.active()
            && removed_ids.iter().any(|removed| removed == active)
        {
            let previous = self.active.clear();
            events.push(SidebarEvent::ActiveChanged { previous, current: None });
        }
        self.mark(RenderScope::Structure);
        self.persist();
        Ok(events)
    }

    pub fn update_item(&mut self, id: &str, patch: &ItemPatch) -> Result<Vec<SidebarEvent>, TreeError> {
        let reclassified = self.tree.update_item(id, patch)?;
        let presentation = patch.text.is_some() || patch.description.is_some() || patch.icon.is_some();
        if presentation {
            self.mark(RenderScope::Structure);
        } else if reclassified || patch.disabled.is_some() {
            self.mark(RenderScope::Attributes);
        }
        self.persist();
        Ok(Vec::new())
    }

    // ---- attributes and layout ----

    /// Attribute-changed hook.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<Vec<SidebarEvent>, ConfigError> {
        let change = self.config.set_attribute(name, value)?;
        let mut events = Vec::new();
        match change {
            AttributeChange::None => {}
            AttributeChange::Render => self.mark(RenderScope::Structure),
            AttributeChange::Layout => {
                self.mark(RenderScope::Structure);
                self.reconcile_layout(&mut events);
            }
            AttributeChange::AutoLayout => {
                if self.config.auto_layout {
                    self.layout.enable();
                    self.reconcile_layout(&mut events);
                } else {
                    let resets = self.layout.disable();
                    debug!(regions = resets.len(), "auto-layout disabled; region margins reset");
                }
            }
            AttributeChange::DataSource => {
                if self.attached && self.config.data_source.is_some() {
                    self.load_configured_items(&mut events);
                }
            }
            AttributeChange::Polling => self.effects.push(SidebarEffect::RestartPolling),
            AttributeChange::Identity => self.persist(),
        }
        debug!(attribute = name, ?change, "sidebar attribute applied");
        Ok(events)
    }

    /// Debounced viewport width.
    pub fn set_viewport(&mut self, width: u16) -> Vec<SidebarEvent> {
        if self.viewport_width == Some(width) {
            return Vec::new();
        }
        self.viewport_width = Some(width);
        let mut events = Vec::new();
        self.reconcile_layout(&mut events);
        events
    }

    /// Add an adjacent region and apply the current layout to it.
    pub fn register_region(&mut self, name: impl Into<String>) -> Vec<SidebarEvent> {
        let mut events = Vec::new();
        if self.layout.register_region(name) {
            self.reconcile_layout(&mut events);
        }
        events
    }

    /// Layout derived from the current configuration, collapse flag and viewport.
    pub fn layout_info(&self) -> LayoutInfo {
        compute_layout(&LayoutInput {
            position: self.config.position,
            collapsed: self.collapsed,
            width_expanded: self.config.width,
            width_collapsed: self.config.collapsed_width,
            viewport_width: self.viewport_width,
        })
    }

    fn reconcile_layout(&mut self, events: &mut Vec<SidebarEvent>) {
        let info = self.layout_info();
        if !info.is_mobile && self.mobile_open {
            events.extend(self.close_mobile());
        }
        let Some(applied) = self.layout.reconcile(info) else {
            return;
        };
        for (region, margins) in &applied.updates {
            debug!(
                region = %region,
                margin_left = margins.margin_left,
                margin_right = margins.margin_right,
                "region margins updated"
            );
        }
        if applied.info_changed {
            events.push(SidebarEvent::LayoutChanged(applied.info));
        }
    }

    // ---- render bookkeeping ----

    fn mark(&mut self, scope: RenderScope) {
        self.render = self.render.max(scope);
    }

    /// Pending render scope without clearing it.
    pub fn pending_render(&self) -> RenderScope {
        self.render
    }

    /// Take the pending render scope, leaving the sidebar clean.
    pub fn take_render(&mut self) -> RenderScope {
        std::mem::take(&mut self.render)
    }

    fn view_state(&self) -> ViewState<'_> {
        ViewState {
            tree: &self.tree,
            expansion: &self.expansion,
            active_id: self.active.active(),
            search: &self.search,
        }
    }

    /// Rows currently visible.
    pub fn rows(&self) -> Vec<ViewRow> {
        view::project(self.view_state())
    }

    // ---- accessors ----

    pub fn config(&self) -> &SidebarConfig {
        &self.config
    }

    pub fn tree(&self) -> &ItemTree {
        &self.tree
    }

    pub fn layout(&self) -> &LayoutReconciler {
        &self.layout
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_mobile_open(&self) -> bool {
        self.mobile_open
    }

    /// Viewport is at or below the mobile breakpoint; region margins are zero.
    pub fn is_mobile(&self) -> bool {
        self.layout_info().is_mobile
    }

    /// Mobile layout with `responsive` set: the sidebar is an overlay drawer
    /// shown only while open.
    pub fn uses_drawer(&self) -> bool {
        self.config.responsive && self.is_mobile()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.active()
    }

    pub fn search_query(&self) -> &str {
        self.search.query()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expansion.is_expanded(id)
    }

    pub fn expanded_ids(&self) -> Vec<String> {
        self.expansion.to_vec()
    }

    pub fn viewport_width(&self) -> Option<u16> {
        self.viewport_width
    }
}

fn expansion_event(change: ExpansionChange) -> SidebarEvent {
    SidebarEvent::ItemExpansion {
        id: change.id,
        expanded: change.expanded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navtree_types::ItemBehavior;
    use navtree_util::InMemoryStateStore;

    fn sidebar() -> Sidebar {
        let mut sidebar = Sidebar::new(SidebarConfig::default())
            .with_items(vec![
                SidebarItem::new("a", "Alpha"),
                SidebarItem::new("b", "Beta").with_children(vec![SidebarItem::new("b1", "Beta One")]),
            ])
            .unwrap();
        sidebar.attach();
        sidebar.take_render();
        sidebar
    }

    #[test]
    fn attach_without_source_seeds_default_items() {
        let mut sidebar = Sidebar::new(SidebarConfig::default());
        sidebar.attach();
        let ids: Vec<_> = sidebar.tree().roots().iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["dashboard", "users", "settings"]);
    }

    #[test]
    fn disabled_items_ignore_clicks() {
        let mut sidebar = Sidebar::new(SidebarConfig::default())
            .with_items(vec![SidebarItem::new("off", "Off").disabled(true)])
            .unwrap();
        sidebar.attach();
        assert!(sidebar.click("off").is_empty());
        assert_eq!(sidebar.active_id(), None);
    }

    #[test]
    fn click_events_follow_the_state_change() {
        let mut sidebar = sidebar();
        let events = sidebar.click("b");
        assert_eq!(
            events,
            vec![
                SidebarEvent::ItemExpansion {
                    id: "b".into(),
                    expanded: true
                },
                SidebarEvent::ItemClick {
                    id: "b".into(),
                    text: "Beta".into(),
                    behavior: ItemBehavior::Expandable
                },
            ]
        );
        assert_eq!(sidebar.pending_render(), RenderScope::Attributes);
    }

    #[test]
    fn removing_the_active_item_clears_it() {
        let mut sidebar = sidebar();
        sidebar.click("b");
        sidebar.click("b1");
        let events = sidebar.remove_item("b").unwrap();
        assert_eq!(
            events,
            vec![SidebarEvent::ActiveChanged {
                previous: Some("b1".into()),
                current: None
            }]
        );
        assert!(sidebar.is_expanded("b"));
    }

    #[test]
    fn state_is_saved_on_mutation_and_restored_on_attach() {
        let store = Arc::new(InMemoryStateStore::new());
        let config = SidebarConfig::from_attributes([("remember-state", Some("")), ("id", Some("main"))]);
        let mut first = Sidebar::new(config.clone()).with_store(store.clone());
        first.attach();
        first.click("users");
        first.search("user");
        first.toggle_collapse();
        first.click("dashboard");

        let mut second = Sidebar::new(config).with_store(store.clone());
        second.attach();
        assert!(second.is_collapsed());
        assert!(second.is_expanded("users"));
        assert_eq!(second.search_query(), "user");
        assert_eq!(second.active_id(), None);
        assert!(store.raw("navtree-sidebar-main").is_some());
    }

    #[test]
    fn corrupted_state_falls_back_to_defaults() {
        let store = Arc::new(InMemoryStateStore::new());
        store.insert_raw("navtree-sidebar-default", "{broken");
        let config = SidebarConfig::from_attributes([("remember-state", Some(""))]);
        let mut sidebar = Sidebar::new(config).with_store(store);
        sidebar.attach();
        assert!(!sidebar.is_collapsed());
        assert!(sidebar.expanded_ids().is_empty());
    }

    #[test]
    fn inline_data_source_errors_substitute_an_empty_tree() {
        let config = SidebarConfig::from_attributes([("data-source", Some("[{not json"))]);
        let mut sidebar = Sidebar::new(config);
        let events = sidebar.attach();
        assert!(sidebar.tree().is_empty());
        assert!(events.iter().any(|event| matches!(event, SidebarEvent::DataError { .. })));
    }

    #[test]
    fn remote_data_source_is_queued_as_an_effect() {
        let config = SidebarConfig::from_attributes([("data-source", Some("https://example.com/menu.json"))]);
        let mut sidebar = Sidebar::new(config);
        sidebar.attach();
        assert!(sidebar.is_loading());
        assert!(matches!(sidebar.take_effects().as_slice(), [SidebarEffect::FetchItems(url)] if url.path() == "/menu.json"));
    }

    #[test]
    fn failed_refresh_keeps_the_last_known_good_tree() {
        let mut sidebar = sidebar();
        let events = sidebar.apply_refresh(Err(DataSourceError::Status { status: 503 }));
        assert_eq!(sidebar.tree().len(), 3);
        assert!(matches!(events.as_slice(), [SidebarEvent::DataError { message }] if message.contains("503")));
        assert!(!sidebar.is_loading());
    }

    #[test]
    fn refresh_applies_auto_expand() {
        let mut sidebar = sidebar();
        let events = sidebar.apply_refresh(Ok(vec![
            SidebarItem::new("reports", "Reports")
                .with_behavior(ItemBehavior::AutoExpand)
                .with_children(vec![SidebarItem::new("daily", "Daily")]),
        ]));
        assert!(sidebar.is_expanded("reports"));
        let Some(SidebarEvent::DataRefreshed { items, .. }) = events.last() else {
            panic!("expected data-refreshed, got {events:?}");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "reports");
        assert_eq!(items[0].children[0].id, "daily");
    }

    #[test]
    fn mobile_drawer_closes_on_escape_and_outside_click() {
        let mut sidebar = sidebar();
        assert_eq!(sidebar.handle(SidebarCommand::OpenMobile), vec![SidebarEvent::MobileToggle { open: true }]);
        assert_eq!(sidebar.handle(SidebarCommand::Escape), vec![SidebarEvent::MobileToggle { open: false }]);
        sidebar.open_mobile();
        sidebar.handle(SidebarCommand::OutsideClick);
        assert!(!sidebar.is_mobile_open());
    }

    #[test]
    fn disabling_auto_layout_resets_regions() {
        let mut sidebar = sidebar();
        sidebar.register_region("main");
        assert_eq!(sidebar.layout().margins("main").margin_left, 250);

        sidebar.set_attribute("auto-layout", Some("false")).unwrap();
        assert_eq!(sidebar.layout().margins("main").margin_left, 0);
        assert!(sidebar.toggle_collapse().iter().all(|event| !matches!(event, SidebarEvent::LayoutChanged(_))));

        sidebar.set_attribute("auto-layout", None).unwrap();
        assert_eq!(sidebar.layout().margins("main").margin_left, 60);
    }

    #[test]
    fn layout_changed_only_when_the_layout_differs() {
        let mut sidebar = sidebar();
        sidebar.register_region("main");
        assert!(sidebar.set_viewport(1280).is_empty());
        assert!(sidebar.set_viewport(1300).is_empty());

        let events = sidebar.set_viewport(700);
        assert!(matches!(events.as_slice(), [SidebarEvent::LayoutChanged(info)] if info.is_mobile));

        let events = sidebar.set_viewport(1024);
        assert!(matches!(events.as_slice(), [SidebarEvent::LayoutChanged(info)] if info.margin_left == 250));
    }

    #[test]
    fn flyout_pick_activates_children() {
        let mut sidebar = sidebar();
        sidebar.toggle_collapse();
        assert_eq!(sidebar.flyout_entries("b").len(), 1);
        sidebar.flyout_pick("b1");
        assert_eq!(sidebar.active_id(), Some("b1"));
    }
}
