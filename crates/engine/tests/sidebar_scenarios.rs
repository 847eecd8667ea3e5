use std::sync::Arc;

use navtree_engine::{
    ActiveItemTracker, ExpansionStore, ItemTree, LayoutInput, Sidebar, classify_item, compute_layout, matches,
    parse_items,
};
use navtree_types::{Position, RegionMargins, SidebarCommand, SidebarConfig, SidebarEvent, SidebarItem, Snapshot};
use navtree_util::{JsonStateStore, StateStore};

fn scenario_items() -> Vec<SidebarItem> {
    vec![
        SidebarItem::new("A", "Alpha"),
        SidebarItem::new("B", "Beta").with_children(vec![SidebarItem::new("B1", "Beta One"), SidebarItem::new("B2", "Beta Two")]),
    ]
}

fn scenario_sidebar() -> Sidebar {
    let mut sidebar = Sidebar::new(SidebarConfig::default()).with_items(scenario_items()).expect("valid items");
    sidebar.attach();
    sidebar
}

#[test]
fn classification_is_deterministic() {
    let tree = ItemTree::from_items(scenario_items()).expect("valid items");
    for entry in tree.walk() {
        assert_eq!(classify_item(entry.item), classify_item(entry.item));
        assert_eq!(tree.capabilities(&entry.item.id), Some(classify_item(entry.item)));
    }
    let a = tree.capabilities("A").expect("A classified");
    let b = tree.capabilities("B").expect("B classified");
    assert!(a.is_clickable && !a.is_expandable);
    assert!(b.is_expandable && !b.is_clickable);
}

#[test]
fn click_scenario_toggles_parents_and_activates_leaves() {
    let mut sidebar = scenario_sidebar();

    sidebar.handle(SidebarCommand::Click("A".into()));
    assert_eq!(sidebar.active_id(), Some("A"));

    sidebar.handle(SidebarCommand::Click("B".into()));
    assert_eq!(sidebar.expanded_ids(), vec!["B".to_string()]);
    assert_eq!(sidebar.active_id(), Some("A"));

    sidebar.handle(SidebarCommand::Click("B".into()));
    assert!(sidebar.expanded_ids().is_empty());
    assert_eq!(sidebar.active_id(), Some("A"));
}

#[test]
fn expand_all_only_adds_items_with_children() {
    let mut sidebar = scenario_sidebar();
    let events = sidebar.handle(SidebarCommand::ExpandAll);
    assert_eq!(sidebar.expanded_ids(), vec!["B".to_string()]);
    assert_eq!(
        events,
        vec![SidebarEvent::ItemExpansion {
            id: "B".into(),
            expanded: true
        }]
    );

    sidebar.handle(SidebarCommand::Click("B2".into()));
    sidebar.handle(SidebarCommand::RequestExpand("stale".into()));
    sidebar.handle(SidebarCommand::CollapseAll);
    assert!(sidebar.expanded_ids().is_empty());
}

#[test]
fn expand_all_then_collapse_all_always_empties() {
    let tree = ItemTree::from_items(parse_items(include_str!("data/menu.json")).expect("fixture parses")).expect("valid");
    let mut store = ExpansionStore::from_ids(["dashboard", "unknown"]);
    store.expand_all(&tree);
    assert_eq!(store.to_vec(), vec!["dashboard", "unknown", "reports", "admin", "roles"]);
    store.collapse_all();
    assert!(store.is_empty());
}

#[test]
fn activation_is_mutually_exclusive() {
    let mut tracker = ActiveItemTracker::new();
    tracker.set_active("A");
    tracker.set_active("B");
    assert_eq!(tracker.active(), Some("B"));
    assert!(!tracker.is_active("A"));
}

#[test]
fn search_matching_is_case_insensitive_and_empty_matches_all() {
    let tree = ItemTree::from_items(parse_items(include_str!("data/menu.json")).expect("fixture parses")).expect("valid");
    for entry in tree.walk() {
        assert!(matches(entry.item, ""));
        assert_eq!(matches(entry.item, "AUDIT"), matches(entry.item, "audit"));
    }
}

#[test]
fn search_does_not_mutate_expansion_or_activation() {
    let mut sidebar = scenario_sidebar();
    sidebar.handle(SidebarCommand::Click("B".into()));
    sidebar.handle(SidebarCommand::Click("B1".into()));

    let events = sidebar.handle(SidebarCommand::Search("ALPHA".into()));
    assert_eq!(
        events,
        vec![SidebarEvent::SearchChanged {
            query: "ALPHA".into(),
            visible_count: 1
        }]
    );
    let visible: Vec<_> = sidebar.rows().into_iter().map(|row| row.id).collect();
    assert_eq!(visible, vec!["A".to_string()]);
    assert_eq!(sidebar.expanded_ids(), vec!["B".to_string()]);
    assert_eq!(sidebar.active_id(), Some("B1"));
    assert_eq!(sidebar.tree().len(), 4);
}

#[test]
fn layout_scenario_left_expanded_then_collapsed() {
    let mut input = LayoutInput {
        position: Position::Left,
        collapsed: false,
        width_expanded: 280,
        width_collapsed: 60,
        viewport_width: None,
    };
    let expanded = compute_layout(&input);
    assert_eq!((expanded.margin_left, expanded.margin_right), (280, 0));

    input.collapsed = true;
    let collapsed = compute_layout(&input);
    assert_eq!((collapsed.margin_left, collapsed.margin_right), (60, 0));
}

#[test]
fn sidebar_layout_follows_toggle_and_breakpoint() {
    let config = SidebarConfig::from_attributes([("width", Some("280px")), ("responsive", Some(""))]);
    let mut sidebar = Sidebar::new(config).with_items(scenario_items()).expect("valid items");
    sidebar.attach();
    sidebar.handle(SidebarCommand::RegisterRegion("main".into()));
    sidebar.handle(SidebarCommand::Viewport(1280));
    assert_eq!(sidebar.layout().margins("main").margin_left, 280);

    let events = sidebar.handle(SidebarCommand::ToggleCollapse);
    assert_eq!(events[0], SidebarEvent::Toggle { collapsed: true });
    assert!(matches!(events[1], SidebarEvent::LayoutChanged(info) if info.width == 60 && info.margin_left == 60));

    sidebar.handle(SidebarCommand::Viewport(600));
    assert!(sidebar.uses_drawer());
    assert_eq!(sidebar.layout().margins("main").margin_left, 0);

    sidebar.handle(SidebarCommand::OpenMobile);
    let events = sidebar.handle(SidebarCommand::Viewport(1024));
    assert!(events.contains(&SidebarEvent::MobileToggle { open: false }));
    assert_eq!(sidebar.layout().margins("main").margin_left, 60);
}

#[test]
fn narrow_viewport_drops_margins_without_responsive() {
    let mut sidebar = Sidebar::new(SidebarConfig::default());
    sidebar.attach();
    sidebar.register_region("main");
    assert_eq!(sidebar.layout().margins("main").margin_left, 250);

    sidebar.set_viewport(600);
    assert!(sidebar.is_mobile());
    assert!(!sidebar.uses_drawer());
    assert_eq!(sidebar.layout().margins("main"), RegionMargins::ZERO);

    sidebar.set_viewport(1024);
    assert_eq!(sidebar.layout().margins("main").margin_left, 250);
}

#[test]
fn right_position_moves_the_margin() {
    let mut sidebar = scenario_sidebar();
    sidebar.handle(SidebarCommand::RegisterRegion("main".into()));
    sidebar.handle(SidebarCommand::SetAttribute {
        name: "position".into(),
        value: Some("right".into()),
    });
    let margins = sidebar.layout().margins("main");
    assert_eq!((margins.margin_left, margins.margin_right), (0, 250));
}

#[test]
fn persistence_round_trip_through_a_state_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.json");
    let config = SidebarConfig::from_attributes([("remember-state", Some("")), ("id", Some("nav"))]);

    {
        let store = Arc::new(JsonStateStore::new(Some(path.clone())).expect("store"));
        let mut sidebar = Sidebar::new(config.clone()).with_items(scenario_items()).expect("valid").with_store(store);
        sidebar.attach();
        sidebar.handle(SidebarCommand::Click("B".into()));
        sidebar.handle(SidebarCommand::Click("A".into()));
        sidebar.handle(SidebarCommand::Search("beta".into()));
        sidebar.detach();
    }

    let store = JsonStateStore::new(Some(path)).expect("store");
    let expected = Snapshot {
        collapsed: false,
        search_query: "beta".into(),
        expanded_items: vec!["B".into()],
    };
    assert_eq!(store.load("navtree-sidebar-nav").expect("load"), Some(expected));

    let mut restored = Sidebar::new(config).with_items(scenario_items()).expect("valid").with_store(Arc::new(store));
    restored.attach();
    assert!(restored.is_expanded("B"));
    assert_eq!(restored.search_query(), "beta");
    assert_eq!(restored.active_id(), None);
}

#[test]
fn inline_json_source_loads_and_auto_expands() {
    let json = include_str!("data/menu.json");
    let config = SidebarConfig::from_attributes([("data-source", Some(json))]);
    let mut sidebar = Sidebar::new(config);
    let events = sidebar.attach();

    assert_eq!(sidebar.tree().len(), 8);
    assert!(sidebar.is_expanded("reports"));
    let refreshed: Vec<&str> = events
        .iter()
        .find_map(|event| match event {
            SidebarEvent::DataRefreshed { items, .. } => Some(items.iter().map(|item| item.id.as_str()).collect()),
            _ => None,
        })
        .expect("data-refreshed emitted");
    assert_eq!(refreshed, vec!["dashboard", "reports", "admin"]);

    assert!(sidebar.handle(SidebarCommand::Click("monthly".into())).is_empty());
}

#[test]
fn add_and_remove_reclassify_the_parent() {
    let mut sidebar = scenario_sidebar();
    sidebar.handle(SidebarCommand::AddItem {
        item: SidebarItem::new("A1", "Alpha One"),
        parent_id: Some("A".into()),
    });
    let caps = sidebar.tree().capabilities("A").expect("A classified");
    assert!(caps.is_expandable && !caps.is_clickable);

    sidebar.handle(SidebarCommand::RemoveItem("A1".into()));
    assert!(sidebar.tree().capabilities("A").expect("A classified").is_clickable);

    sidebar.handle(SidebarCommand::AddItem {
        item: SidebarItem::new("B1", "duplicate"),
        parent_id: None,
    });
    assert_eq!(sidebar.tree().len(), 4);
}
