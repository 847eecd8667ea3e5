use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::helpers as th;

const KEY_HINTS: &[(&str, &str)] = &[
    ("Tab", "focus"),
    ("Enter", "select"),
    ("←/→", "collapse/expand"),
    ("/", "search"),
    ("Ctrl+B", "collapse sidebar"),
    ("E/C", "expand/collapse all"),
    ("r", "reload"),
    ("t", "theme"),
    ("q", "quit"),
];

/// The `main` region: what the host page would show next to the sidebar.
#[derive(Debug, Default)]
pub struct ContentComponent;

impl Component for ContentComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let block = th::block(theme, Some("Main"), false);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let mut lines = Vec::new();
        match app.sidebar.active_id().and_then(|id| app.sidebar.tree().find(id)) {
            Some(item) => {
                lines.push(Line::from(Span::styled(item.text.clone(), theme.accent_emphasis_style())));
                if !item.description.is_empty() {
                    lines.push(Line::from(Span::styled(item.description.clone(), theme.text_secondary_style())));
                }
                let detail = match app.sidebar.tree().capabilities(&item.id) {
                    Some(caps) => format!("id: {} · {}", item.id, caps.effective_behavior.as_str()),
                    None => format!("id: {}", item.id),
                };
                lines.push(Line::from(Span::styled(detail, theme.text_muted_style())));
            }
            None => lines.push(Line::from(Span::styled("No active item", theme.text_muted_style()))),
        }
        lines.push(Line::default());

        let info = app.sidebar.layout_info();
        let viewport = app
            .sidebar
            .viewport_width()
            .map(|width| format!("{width}px"))
            .unwrap_or_else(|| "unknown".to_string());
        lines.push(Line::from(Span::styled(
            format!(
                "sidebar {} · {}px · margins {}/{} · viewport {}",
                info.position.as_str(),
                info.width,
                info.margin_left,
                info.margin_right,
                viewport
            ),
            theme.text_secondary_style(),
        )));
        if app.sidebar.uses_drawer() {
            let hint = if app.sidebar.is_mobile_open() {
                "Mobile layout: Esc or click outside closes the drawer"
            } else {
                "Mobile layout: press m to open the navigation drawer"
            };
            lines.push(Line::from(Span::styled(hint, theme.status_info())));
        } else if info.is_mobile {
            lines.push(Line::from(Span::styled(
                "Narrow viewport: region margins are off and the sidebar overlaps this area",
                theme.status_warning(),
            )));
        }
        lines.push(Line::default());

        let mut hints = Vec::with_capacity(KEY_HINTS.len() * 2);
        for (key, action) in KEY_HINTS {
            hints.push(Span::styled(format!(" {key}"), theme.accent_primary_style()));
            hints.push(Span::styled(format!(" {action} "), theme.text_muted_style()));
        }
        lines.push(Line::from(hints));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
