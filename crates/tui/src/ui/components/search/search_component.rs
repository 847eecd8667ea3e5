use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use navtree_types::SidebarCommand;
use rat_focus::HasFocus;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::{App, Effect};
use crate::ui::components::Component;
use crate::ui::theme::helpers::blend;

const LABEL: &str = "Search";

/// Search box with a floating label. Every edit sends the full query.
#[derive(Debug, Default)]
pub struct SearchComponent;

impl SearchComponent {
    fn query_changed(app: &mut App) -> Vec<Effect> {
        let query = app.search.query().to_string();
        app.dispatch(SidebarCommand::Search(query))
    }
}

impl Component for SearchComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let input = &mut app.search.input;
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.insert_char(c);
                return Self::query_changed(app);
            }
            KeyCode::Char('u') => {
                input.clear();
                return Self::query_changed(app);
            }
            KeyCode::Backspace => {
                if input.backspace() {
                    return Self::query_changed(app);
                }
            }
            KeyCode::Delete => {
                if input.delete() {
                    return Self::query_changed(app);
                }
            }
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            KeyCode::Esc => {
                if !input.is_empty() {
                    input.clear();
                    return Self::query_changed(app);
                }
                app.focus.focus(&app.nav);
            }
            KeyCode::Enter | KeyCode::Down => app.focus.focus(&app.nav),
            _ => return Vec::new(),
        }
        app.mark_dirty();
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        app.focus.focus(&app.search);
        app.mark_dirty();
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let roles = theme.roles();
        let focused = app.search.is_focused();
        let progress = app.search.label.progress();
        let label_style = Style::default().fg(blend(roles.text_muted, roles.accent_primary, progress));

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border_style(focused));
        // Past the halfway frame the label sits in the top border.
        if progress >= 0.5 {
            block = block.title(Span::styled(format!(" {LABEL} "), label_style.add_modifier(Modifier::BOLD)));
        }
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let content = if app.search.input.is_empty() && progress < 0.5 {
            Paragraph::new(Span::styled(format!("{LABEL}…"), label_style))
        } else {
            Paragraph::new(app.search.query()).style(theme.text_primary_style())
        };
        frame.render_widget(content, inner);

        if focused && inner.width > 0 {
            let column = app.search.input.cursor_columns().min(inner.width - 1);
            frame.set_cursor_position(Position::new(inner.x + column, inner.y));
        }
        app.search.last_area = rect;
    }
}
