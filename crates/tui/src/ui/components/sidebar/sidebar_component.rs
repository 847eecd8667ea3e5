use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use navtree_engine::ViewRow;
use navtree_types::{Position, SidebarCommand};
use rat_focus::HasFocus;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Borders, Clear, Paragraph},
};

use crate::app::{App, Effect, THROBBER};
use crate::ui::components::{Component, SearchComponent};
use crate::ui::theme::{Theme, helpers as th};

const FLYOUT_WIDTH: u16 = 28;

/// Docked navigation panel: header, search slot, item rows and footer.
///
/// When the sidebar is collapsed only icons are drawn and selecting a parent
/// opens a flyout listing its direct children.
#[derive(Debug, Default)]
pub struct SidebarComponent {
    search: SearchComponent,
}

impl SidebarComponent {
    /// Key handling for the search slot, routed here while it has focus.
    pub fn handle_search_keys(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        self.search.handle_key_events(app, key)
    }

    fn activate_row(app: &mut App, row: &ViewRow) -> Vec<Effect> {
        if app.sidebar.is_collapsed() && row.has_children {
            if row.disabled {
                return Vec::new();
            }
            app.nav.open_flyout(row.id.clone());
            app.mark_dirty();
            return Vec::new();
        }
        app.dispatch(SidebarCommand::Click(row.id.clone()))
    }

    fn handle_flyout_keys(app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(flyout) = app.nav.flyout.clone() else {
            return Vec::new();
        };
        let entries = app.sidebar.flyout_entries(&flyout.parent_id);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(state) = app.nav.flyout.as_mut() {
                    state.cursor = state.cursor.saturating_sub(1);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(state) = app.nav.flyout.as_mut()
                    && state.cursor + 1 < entries.len()
                {
                    state.cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(entry) = entries.get(flyout.cursor) {
                    let id = entry.id.clone();
                    app.nav.close_flyout();
                    return app.dispatch(SidebarCommand::FlyoutPick(id));
                }
            }
            KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => app.nav.close_flyout(),
            _ => return Vec::new(),
        }
        app.mark_dirty();
        Vec::new()
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.theme;
        let config = app.sidebar.config();
        let collapsed = app.sidebar.is_collapsed();
        app.nav.toggle_area = None;

        let mut title_area = area;
        if config.collapsible && area.width >= 3 {
            let pointing_in = (config.position == Position::Left) != collapsed;
            let glyph = if pointing_in { " « " } else { " » " };
            let toggle = match config.position {
                Position::Left => Rect::new(area.right() - 3, area.y, 3, 1),
                Position::Right => Rect::new(area.x, area.y, 3, 1),
            };
            frame.render_widget(Paragraph::new(glyph).style(theme.accent_primary_style()), toggle);
            app.nav.toggle_area = Some(toggle);
            title_area.width -= 3;
            if config.position == Position::Right {
                title_area.x += 3;
            }
        }
        if !collapsed {
            let title = Paragraph::new(Span::styled(format!(" {}", config.title), theme.accent_emphasis_style()));
            frame.render_widget(title, title_area);
        }
    }

    fn render_rows(&self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.theme;
        let collapsed = app.sidebar.is_collapsed();
        let rows = app.sidebar.rows();
        app.nav.list_area = area;
        app.nav.row_areas.clear();
        app.nav.clamp_cursor(rows.len());
        app.nav.ensure_visible(area.height as usize);

        if rows.is_empty() {
            let message = if app.sidebar.is_loading() {
                "Loading…"
            } else if !app.sidebar.search_query().is_empty() {
                "No matches"
            } else {
                "No items"
            };
            if !collapsed {
                frame.render_widget(Paragraph::new(format!(" {message}")).style(theme.text_muted_style()), area);
            }
            return;
        }

        let highlight_cursor = app.nav.is_focused();
        let offset = app.nav.offset;
        for (index, row) in rows.iter().enumerate().skip(offset).take(area.height as usize) {
            let row_area = Rect::new(area.x, area.y + (index - offset) as u16, area.width, 1);
            let is_cursor = highlight_cursor && index == app.nav.cursor;
            let paragraph = if collapsed {
                Paragraph::new(collapsed_label(row)).alignment(Alignment::Center)
            } else {
                Paragraph::new(expanded_line(theme, row))
            };
            frame.render_widget(paragraph.style(row_style(theme, row, is_cursor)), row_area);
            app.nav.row_areas.push((row.id.clone(), row_area));
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let text = if app.sidebar.is_loading() {
            format!(" {} Loading…", THROBBER[app.throbber_idx % THROBBER.len()])
        } else if app.sidebar.is_collapsed() {
            format!(" {}", app.sidebar.tree().len())
        } else {
            format!(" {} items", app.sidebar.tree().len())
        };
        let footer = Paragraph::new(text)
            .style(theme.text_muted_style())
            .block(ratatui::widgets::Block::default().borders(Borders::TOP).border_style(theme.border_style(false)));
        frame.render_widget(footer, area);
    }

    fn render_flyout(&self, frame: &mut Frame, sidebar_area: Rect, app: &mut App) {
        let Some(flyout) = app.nav.flyout.clone() else {
            return;
        };
        let entries = app.sidebar.flyout_entries(&flyout.parent_id);
        let screen = frame.area();
        let anchor_y = app
            .nav
            .row_areas
            .iter()
            .find(|(id, _)| *id == flyout.parent_id)
            .map(|(_, area)| area.y)
            .unwrap_or(sidebar_area.y);
        let width = FLYOUT_WIDTH.min(screen.width);
        let height = (entries.len() as u16 + 2).min(screen.height);
        let x = match app.sidebar.config().position {
            Position::Left => sidebar_area.right().min(screen.right() - width),
            Position::Right => sidebar_area.x.saturating_sub(width),
        };
        let y = anchor_y.min(screen.bottom() - height);
        let area = Rect::new(x, y, width, height);

        let theme = &*app.theme;
        let title = app.sidebar.tree().find(&flyout.parent_id).map(|item| item.text.clone()).unwrap_or_default();
        let block = th::block(theme, Some(title.as_str()), true).style(theme.modal_background_style());
        let inner = block.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let mut entry_areas = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate().take(inner.height as usize) {
            let entry_area = Rect::new(inner.x, inner.y + index as u16, inner.width, 1);
            let label = Line::from(vec![Span::raw(" "), Span::raw(icon_prefix(entry)), Span::raw(entry.text.clone())]);
            frame.render_widget(
                Paragraph::new(label).style(row_style(theme, entry, index == flyout.cursor)),
                entry_area,
            );
            entry_areas.push((entry.id.clone(), entry_area));
        }
        app.nav.flyout_area = area;
        app.nav.flyout_row_areas = entry_areas;
    }
}

impl Component for SidebarComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.nav.is_flyout_open() {
            return Self::handle_flyout_keys(app, key);
        }
        let rows = app.sidebar.rows();
        let current = rows.get(app.nav.cursor).cloned();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.nav.move_up(),
            KeyCode::Down | KeyCode::Char('j') => app.nav.move_down(rows.len()),
            KeyCode::Home => app.nav.cursor = 0,
            KeyCode::End => app.nav.cursor = rows.len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(row) = current {
                    return Self::activate_row(app, &row);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => match current {
                Some(row) if row.is_expandable && !row.expanded => {
                    return app.dispatch(SidebarCommand::RequestExpand(row.id));
                }
                Some(row) if row.expanded && row.has_children => app.nav.move_down(rows.len()),
                Some(row) if app.sidebar.is_collapsed() && row.has_children => {
                    return Self::activate_row(app, &row);
                }
                _ => {}
            },
            KeyCode::Left | KeyCode::Char('h') => match current {
                Some(row) if row.is_expandable && row.expanded => {
                    return app.dispatch(SidebarCommand::RequestCollapse(row.id));
                }
                Some(row) if row.depth > 0 => {
                    if let Some(parent) = rows[..app.nav.cursor].iter().rposition(|candidate| candidate.depth < row.depth) {
                        app.nav.cursor = parent;
                    }
                }
                _ => {}
            },
            KeyCode::Esc => return app.dispatch(SidebarCommand::Escape),
            _ => return Vec::new(),
        }
        app.mark_dirty();
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {}
            MouseEventKind::ScrollUp => {
                app.nav.move_up();
                app.mark_dirty();
                return Vec::new();
            }
            MouseEventKind::ScrollDown => {
                let len = app.sidebar.rows().len();
                app.nav.move_down(len);
                app.mark_dirty();
                return Vec::new();
            }
            _ => return Vec::new(),
        }
        let (column, row) = (mouse.column, mouse.row);

        if let Some((_, id)) = app.nav.flyout_entry_at(column, row) {
            let id = id.to_string();
            app.nav.close_flyout();
            return app.dispatch(SidebarCommand::FlyoutPick(id));
        }
        if app.nav.is_flyout_open() {
            app.nav.close_flyout();
            app.mark_dirty();
        }
        if app.nav.hits_toggle(column, row) {
            return app.dispatch(SidebarCommand::ToggleCollapse);
        }
        if app.search_visible() && app.search.last_area.contains(ratatui::layout::Position::new(column, row)) {
            app.focus.focus(&app.search);
            app.mark_dirty();
            return Vec::new();
        }
        let Some((index, id)) = app.nav.row_at(column, row) else {
            return Vec::new();
        };
        let id = id.to_string();
        app.nav.cursor = index;
        app.focus.focus(&app.nav);
        app.mark_dirty();
        match app.sidebar.rows().into_iter().find(|candidate| candidate.id == id) {
            Some(target) => Self::activate_row(app, &target),
            None => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let focused = app.nav.is_focused() || app.search.is_focused();
        let block = th::block(&*app.theme, None, focused).style(th::panel_style(&*app.theme));
        let inner = block.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);
        app.nav.last_area = area;

        let config = app.sidebar.config();
        let show_header = config.show_header;
        let show_footer = config.show_footer;
        let show_search = app.search_visible();

        let mut constraints = Vec::with_capacity(4);
        if show_header {
            constraints.push(Constraint::Length(1));
        }
        if show_search {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(0));
        if show_footer {
            constraints.push(Constraint::Length(2));
        }
        let chunks = Layout::vertical(constraints).split(inner);
        let mut slots = chunks.iter().copied();

        if show_header && let Some(header) = slots.next() {
            self.render_header(frame, header, app);
        } else {
            app.nav.toggle_area = None;
        }
        if show_search && let Some(search) = slots.next() {
            self.search.render(frame, search, app);
        }
        if let Some(list) = slots.next() {
            self.render_rows(frame, list, app);
        }
        if show_footer && let Some(footer) = slots.next() {
            self.render_footer(frame, footer, app);
        }
        self.render_flyout(frame, area, app);
    }
}

fn icon_prefix(row: &ViewRow) -> String {
    if row.icon.is_empty() {
        String::new()
    } else {
        format!("{} ", row.icon)
    }
}

fn collapsed_label(row: &ViewRow) -> String {
    if !row.icon.is_empty() {
        return row.icon.clone();
    }
    row.text.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}

fn expanded_line<'a>(theme: &dyn Theme, row: &'a ViewRow) -> Line<'a> {
    let marker = match (row.is_expandable, row.expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };
    let mut spans = vec![
        Span::raw(" ".repeat(1 + row.depth * 2)),
        Span::raw(marker),
        Span::raw(icon_prefix(row)),
        Span::raw(row.text.as_str()),
    ];
    if !row.description.is_empty() {
        spans.push(Span::styled(format!("  {}", row.description), theme.text_muted_style()));
    }
    Line::from(spans)
}

fn row_style(theme: &dyn Theme, row: &ViewRow, is_cursor: bool) -> Style {
    let base = if row.disabled {
        theme.disabled_item_style()
    } else if row.active {
        theme.active_item_style()
    } else {
        theme.text_primary_style()
    };
    if is_cursor { base.patch(theme.selection_style()) } else { base }
}
