//! Application state and the message/effect plumbing around the sidebar.
//!
//! `App` owns the [`Sidebar`] plus the purely visual state of each
//! component (cursor, flyout, search buffer, event log). Every mutation of
//! tree state goes through [`App::dispatch`], which forwards a
//! [`SidebarCommand`] to the owner, records the resulting events and turns
//! queued [`SidebarEffect`]s into runtime [`Effect`]s.

use std::time::Instant;

use navtree_engine::{DataSourceError, RefreshOrigin, RenderScope, ResizeDebouncer, Sidebar, SidebarEffect};
use navtree_types::{DataSource, SidebarCommand, SidebarEvent, SidebarItem, ThemeName};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, info};
use url::Url;

use crate::ui::components::events::EventLogState;
use crate::ui::components::search::SearchState;
use crate::ui::components::sidebar::SidebarViewState;
use crate::ui::layout::cells_to_px;
use crate::ui::theme::{self, Theme};

/// Region pushed aside by the sidebar.
pub const MAIN_REGION: &str = "main";
/// Event log strip below the main region; also kept clear of the sidebar.
pub const EVENTS_REGION: &str = "events";

/// Frames of the loading indicator shown in the footer.
pub const THROBBER: [&str; 4] = ["⠋", "⠙", "⠸", "⠴"];

/// Messages the runtime feeds into the app.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Animation / housekeeping tick.
    Tick,
    /// Terminal resized to `(columns, rows)`.
    Resize(u16, u16),
    /// The resize debounce window elapsed.
    ResizeSettled,
    /// Flip between the light and dark palettes.
    ToggleTheme,
    /// Explicit reload of remote items.
    Refresh,
    /// Polling interval fired.
    Poll,
}

/// Side effects the runtime executes outside the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchItems { url: Url, origin: RefreshOrigin },
    RestartPolling,
    Quit,
}

pub struct App {
    pub sidebar: Sidebar,
    pub theme: Box<dyn Theme>,
    theme_name: ThemeName,
    pub focus: Focus,
    container_focus: FocusFlag,
    pub nav: SidebarViewState,
    pub search: SearchState,
    pub events: EventLogState,
    resize: ResizeDebouncer,
    pub throbber_idx: usize,
    dirty: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("sidebar", &self.sidebar)
            .field("theme", &self.theme_name)
            .field("nav", &self.nav)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(sidebar: Sidebar) -> Self {
        let theme_name = sidebar.config().theme;
        let mut app = Self {
            sidebar,
            theme: theme::load(theme_name),
            theme_name,
            focus: Focus::default(),
            container_focus: FocusFlag::named("app"),
            nav: SidebarViewState::default(),
            search: SearchState::default(),
            events: EventLogState::default(),
            resize: ResizeDebouncer::default(),
            throbber_idx: 0,
            dirty: true,
        };
        app.focus = FocusBuilder::build_for(&app);
        app
    }

    /// Attach the sidebar and register the regions it lays out.
    pub fn attach(&mut self, viewport_columns: Option<u16>) -> Vec<Effect> {
        let mut events = self.sidebar.attach();
        if let Some(columns) = viewport_columns {
            events.extend(self.sidebar.set_viewport(cells_to_px(columns)));
        }
        events.extend(self.sidebar.register_region(MAIN_REGION));
        events.extend(self.sidebar.register_region(EVENTS_REGION));
        let animated = self.sidebar.config().animations;
        let query = self.sidebar.search_query().to_string();
        self.search.set_query(&query, animated);
        info!(items = self.sidebar.tree().len(), "sidebar attached");
        self.absorb(events)
    }

    pub fn detach(&mut self) {
        self.sidebar.detach();
    }

    /// Send a command to the sidebar and collect what follows from it.
    pub fn dispatch(&mut self, command: SidebarCommand) -> Vec<Effect> {
        debug!(?command, "dispatching sidebar command");
        let events = self.sidebar.handle(command);
        self.absorb(events)
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.search.label.tick() {
                    self.dirty = true;
                }
                if self.sidebar.is_loading() {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER.len();
                    self.dirty = true;
                }
                Vec::new()
            }
            Msg::Resize(columns, _rows) => {
                self.resize.note(cells_to_px(columns), Instant::now());
                self.dirty = true;
                Vec::new()
            }
            Msg::ResizeSettled => match self.resize.poll(Instant::now()) {
                Some(width) => self.dispatch(SidebarCommand::Viewport(width)),
                None => Vec::new(),
            },
            Msg::ToggleTheme => {
                let next = self.sidebar.config().theme.toggled();
                self.dispatch(SidebarCommand::SetAttribute {
                    name: "theme".into(),
                    value: Some(next.as_str().into()),
                })
            }
            Msg::Refresh => self.refresh_request(RefreshOrigin::Manual).into_iter().collect(),
            Msg::Poll => self.refresh_request(RefreshOrigin::Poll).into_iter().collect(),
        }
    }

    /// Hand a finished fetch to the sidebar.
    pub fn apply_refresh(&mut self, origin: RefreshOrigin, result: Result<Vec<SidebarItem>, DataSourceError>) -> Vec<Effect> {
        debug!(?origin, ok = result.is_ok(), "sidebar refresh finished");
        let events = self.sidebar.apply_refresh(result);
        self.throbber_idx = 0;
        self.absorb(events)
    }

    /// Fetch effect for a manual or polling refresh, if a remote source is configured.
    ///
    /// The polling endpoint takes precedence over a remote `data-source`.
    pub fn refresh_request(&mut self, origin: RefreshOrigin) -> Option<Effect> {
        let config = self.sidebar.config();
        let url = match (&config.api_endpoint, &config.data_source) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, Some(DataSource::Remote(url))) => url.clone(),
            _ => return None,
        };
        self.sidebar.set_loading(true);
        self.dirty = true;
        Some(Effect::FetchItems { url, origin })
    }

    /// Deadline of the pending debounced resize, if any.
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    pub fn is_animating(&self) -> bool {
        self.search.label.is_animating() || self.sidebar.is_loading()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Whether the search box takes part in rendering and focus.
    pub fn search_visible(&self) -> bool {
        self.sidebar.config().searchable && !self.sidebar.is_collapsed()
    }

    fn absorb(&mut self, events: Vec<SidebarEvent>) -> Vec<Effect> {
        for event in &events {
            if let SidebarEvent::DataError { message } = event {
                debug!(%message, "data error surfaced to the event log");
            }
            self.events.record(event);
        }
        if !events.is_empty() {
            self.dirty = true;
        }

        let configured = self.sidebar.config().theme;
        if configured != self.theme_name {
            self.theme_name = configured;
            self.theme = theme::load(configured);
            self.dirty = true;
        }

        if self.sidebar.take_render() != RenderScope::Clean {
            self.dirty = true;
        }
        let rows = self.sidebar.rows();
        self.nav.clamp_cursor(rows.len());
        if let Some(flyout) = &self.nav.flyout
            && (!self.sidebar.is_collapsed() || self.sidebar.flyout_entries(&flyout.parent_id).is_empty())
        {
            self.nav.close_flyout();
        }

        self.sidebar
            .take_effects()
            .into_iter()
            .map(|effect| match effect {
                SidebarEffect::FetchItems(url) => Effect::FetchItems {
                    url,
                    origin: RefreshOrigin::DataSource,
                },
                SidebarEffect::RestartPolling => Effect::RestartPolling,
            })
            .collect()
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        if self.search_visible() {
            builder.widget(&self.search);
        }
        builder.widget(&self.nav);
        builder.widget(&self.events);
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navtree_types::SidebarConfig;

    fn app_with(attributes: &[(&str, Option<&str>)]) -> App {
        let config = SidebarConfig::from_attributes(attributes.iter().copied());
        let mut app = App::new(Sidebar::new(config));
        app.attach(Some(160));
        app
    }

    #[test]
    fn attach_records_events_and_registers_regions() {
        let app = app_with(&[]);
        let regions: Vec<_> = app.sidebar.layout().regions().map(|(name, _)| name.to_string()).collect();
        assert_eq!(regions, vec![MAIN_REGION.to_string(), EVENTS_REGION.to_string()]);
        assert!(app.events.entries().any(|entry| entry.name == "layout-changed"));
    }

    #[test]
    fn theme_toggle_swaps_the_palette() {
        let mut app = app_with(&[]);
        assert_eq!(app.theme_name, ThemeName::Light);
        app.update(Msg::ToggleTheme);
        assert_eq!(app.theme_name, ThemeName::Dark);
        assert_eq!(app.sidebar.config().theme, ThemeName::Dark);
    }

    #[test]
    fn remote_data_source_becomes_a_fetch_effect() {
        let config = SidebarConfig::from_attributes([("data-source", Some("http://127.0.0.1:9/items.json"))]);
        let mut app = App::new(Sidebar::new(config));
        let effects = app.attach(None);
        assert!(matches!(
            effects.as_slice(),
            [Effect::FetchItems { origin: RefreshOrigin::DataSource, .. }]
        ));
        assert!(app.is_animating());
    }

    #[test]
    fn failed_fetch_lands_in_the_event_log() {
        let config = SidebarConfig::from_attributes([("data-source", Some("http://127.0.0.1:9/items.json"))]);
        let mut app = App::new(Sidebar::new(config));
        app.attach(None);
        let effects = app.apply_refresh(RefreshOrigin::DataSource, Err(DataSourceError::Status { status: 503 }));
        assert!(effects.is_empty());
        assert!(!app.sidebar.is_loading());
        assert_eq!(app.events.entries().last().map(|entry| entry.name), Some("data-error"));
    }

    #[test]
    fn refresh_without_remote_source_is_a_no_op() {
        let mut app = app_with(&[]);
        assert!(app.update(Msg::Refresh).is_empty());
        assert!(!app.sidebar.is_loading());
    }

    #[test]
    fn resize_is_applied_once_the_window_settles() {
        let mut app = app_with(&[("responsive", Some(""))]);
        app.update(Msg::Resize(80, 24));
        assert!(app.resize_deadline().is_some());
        std::thread::sleep(navtree_engine::DEFAULT_RESIZE_DEBOUNCE);
        app.update(Msg::ResizeSettled);
        assert!(app.sidebar.is_mobile());
        assert!(app.resize_deadline().is_none());
    }
}
