use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use rat_focus::HasFocus;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Effect};
use crate::ui::components::Component;
use crate::ui::theme::{Theme, helpers as th};

/// Scrollable log of the notifications the sidebar emitted, newest last.
#[derive(Debug, Default)]
pub struct EventsComponent;

impl Component for EventsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.events.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => app.events.scroll_down(),
            KeyCode::Char('x') => app.events.clear(),
            _ => return Vec::new(),
        }
        app.mark_dirty();
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        match mouse.kind {
            MouseEventKind::ScrollUp => app.events.scroll_up(),
            MouseEventKind::ScrollDown => app.events.scroll_down(),
            MouseEventKind::Down(_) => app.focus.focus(&app.events),
            _ => return Vec::new(),
        }
        app.mark_dirty();
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let title = format!("Events ({})", app.events.len());
        let block = th::block(theme, Some(title.as_str()), app.events.is_focused());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        app.events.last_area = rect;

        let height = inner.height as usize;
        let lines: Vec<Line> = app
            .events
            .entries()
            .rev()
            .skip(app.events.scroll)
            .take(height)
            .map(|entry| {
                Line::from(vec![
                    Span::styled(entry.at.format("%H:%M:%S ").to_string(), theme.text_muted_style()),
                    Span::styled(format!("{:<16}", entry.name), name_style(theme, entry.name)),
                    Span::styled(entry.detail.clone(), theme.text_secondary_style()),
                ])
            })
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn name_style(theme: &dyn Theme, name: &str) -> Style {
    match name {
        "data-error" => theme.status_error(),
        "data-refreshed" => theme.status_success(),
        _ => theme.accent_primary_style(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme;
    use navtree_types::ThemeName;

    #[test]
    fn data_events_use_status_colors() {
        let theme = theme::load(ThemeName::Dark);
        assert_eq!(name_style(&*theme, "data-error"), theme.status_error());
        assert_eq!(name_style(&*theme, "data-refreshed"), theme.status_success());
        assert_eq!(name_style(&*theme, "toggle"), theme.accent_primary_style());
    }
}
