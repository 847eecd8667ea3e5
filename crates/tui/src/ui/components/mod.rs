pub mod component;
pub mod content;
pub mod events;
pub mod search;
pub mod sidebar;

pub(crate) use component::Component;
pub use content::ContentComponent;
pub use events::EventsComponent;
pub use search::SearchComponent;
pub use sidebar::SidebarComponent;

use ratatui::layout::{Position, Rect};

/// Index of the area in `areas` containing `(x, y)`, provided the point is
/// also inside `container`.
pub fn find_target_index_by_mouse_position(container: &Rect, areas: &[Rect], x: u16, y: u16) -> Option<usize> {
    let point = Position::new(x, y);
    if !container.contains(point) {
        return None;
    }
    areas.iter().position(|area| area.contains(point))
}
