//! Component system for the sidebar UI.
//!
//! Components are self-contained UI elements that handle their own input
//! and rendering. They never mutate sidebar state directly: input is turned
//! into [`navtree_types::SidebarCommand`]s through [`crate::app::App::dispatch`],
//! and any asynchronous work comes back as [`Effect`]s for the runtime.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::{App, Effect};

pub(crate) trait Component {
    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events that land inside the component.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations only draw and record hit-test areas; state changes
    /// belong in the event handlers.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);
}
