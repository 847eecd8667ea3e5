//! Top-level view: lays out the adjacent regions and the docked sidebar,
//! routes input to the focused component and handles global shortcuts.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use navtree_types::SidebarCommand;
use rat_focus::HasFocus;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    widgets::Block,
};

use crate::app::{App, EVENTS_REGION, Effect, MAIN_REGION, Msg};
use crate::ui::components::{Component, ContentComponent, EventsComponent, SidebarComponent};
use crate::ui::layout::{docked_rect, region_rect};
use crate::ui::theme::helpers as th;

/// Rows reserved for the event log under the main region.
const EVENTS_HEIGHT: u16 = 8;

#[derive(Debug, Default)]
pub struct MainView {
    sidebar_view: SidebarComponent,
    content_view: ContentComponent,
    events_view: EventsComponent,
    /// Area covered by the mobile backdrop in the last frame.
    backdrop_area: Option<Rect>,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give focus back to the item list when nothing holds it.
    pub fn restore_focus(&self, app: &mut App) {
        app.focus.focus(&app.nav);
    }

    pub fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(msg)
    }

    fn sidebar_visible(app: &App) -> bool {
        !app.sidebar.uses_drawer() || app.sidebar.is_mobile_open()
    }

    pub fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                app.mark_dirty();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                app.mark_dirty();
                return Vec::new();
            }
            _ => {}
        }

        if app.search_visible() && app.search.is_focused() {
            return self.sidebar_view.handle_search_keys(app, key);
        }

        let collapsible = app.sidebar.config().collapsible;
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if !control => return vec![Effect::Quit],
            KeyCode::Char('b') if control && collapsible => {
                return app.dispatch(SidebarCommand::ToggleCollapse);
            }
            KeyCode::Char('[') if collapsible => return app.dispatch(SidebarCommand::ToggleCollapse),
            KeyCode::Char('m') if app.sidebar.uses_drawer() => return app.dispatch(SidebarCommand::OpenMobile),
            KeyCode::Char('t') => return app.update(Msg::ToggleTheme),
            KeyCode::Char('r') => return app.update(Msg::Refresh),
            KeyCode::Char('E') => return app.dispatch(SidebarCommand::ExpandAll),
            KeyCode::Char('C') => return app.dispatch(SidebarCommand::CollapseAll),
            KeyCode::Char('/') if app.search_visible() => {
                app.nav.close_flyout();
                app.focus.focus(&app.search);
                app.mark_dirty();
                return Vec::new();
            }
            _ => {}
        }

        if app.nav.is_focused() {
            self.sidebar_view.handle_key_events(app, key)
        } else if app.events.is_focused() {
            self.events_view.handle_key_events(app, key)
        } else if key.code == KeyCode::Esc {
            app.dispatch(SidebarCommand::Escape)
        } else {
            Vec::new()
        }
    }

    pub fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let point = Position::new(mouse.column, mouse.row);
        let is_press = mouse.kind == MouseEventKind::Down(MouseButton::Left);

        if Self::sidebar_visible(app)
            && (app.nav.last_area.contains(point) || (app.nav.is_flyout_open() && app.nav.flyout_area.contains(point)))
        {
            return self.sidebar_view.handle_mouse_events(app, mouse);
        }
        if is_press && app.nav.is_flyout_open() {
            app.nav.close_flyout();
            app.mark_dirty();
        }
        if is_press && self.backdrop_area.is_some_and(|area| area.contains(point)) {
            return app.dispatch(SidebarCommand::OutsideClick);
        }
        if app.events.last_area.contains(point) {
            return self.events_view.handle_mouse_events(app, mouse);
        }
        Vec::new()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        frame.render_widget(Block::default().style(th::page_style(&*app.theme)), area);

        let events_height = if area.height > EVENTS_HEIGHT * 2 { EVENTS_HEIGHT } else { 0 };
        let body = Rect::new(area.x, area.y, area.width, area.height - events_height);
        let log = Rect::new(area.x, area.y + body.height, area.width, events_height);

        let layout = app.sidebar.layout();
        let main_rect = region_rect(body, layout.margins(MAIN_REGION));
        let events_rect = region_rect(log, layout.margins(EVENTS_REGION));

        if main_rect.width > 0 && main_rect.height > 0 {
            self.content_view.render(frame, main_rect, app);
        }
        if events_rect.width > 0 && events_rect.height > 0 {
            self.events_view.render(frame, events_rect, app);
        } else {
            app.events.last_area = Rect::default();
        }

        self.backdrop_area = None;
        if !Self::sidebar_visible(app) {
            app.nav.last_area = Rect::default();
            app.nav.close_flyout();
            return;
        }
        let info = app.sidebar.layout_info();
        let sidebar_rect = docked_rect(area, info.position, info.width);
        if app.sidebar.uses_drawer() {
            frame.render_widget(Block::default().style(app.theme.modal_background_style()), area);
            self.backdrop_area = Some(area);
        }
        self.sidebar_view.render(frame, sidebar_rect, app);
    }
}
