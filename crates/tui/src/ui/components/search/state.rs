use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

use super::floating_label::FloatingLabel;
use super::text_input::TextInputState;

/// Search box state: the query buffer plus its floating label.
#[derive(Debug)]
pub struct SearchState {
    pub input: TextInputState,
    pub label: FloatingLabel,
    pub focus: FocusFlag,
    pub last_area: Rect,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            input: TextInputState::new(),
            label: FloatingLabel::default(),
            focus: FocusFlag::named("sidebar.search"),
            last_area: Rect::default(),
        }
    }
}

impl SearchState {
    pub fn query(&self) -> &str {
        self.input.input()
    }

    /// Replace the buffer without going through key handling (restored state).
    pub fn set_query(&mut self, query: &str, animated: bool) {
        self.input.set_input(query);
        self.sync_label(animated);
    }

    /// Re-target the label from the current focus and content.
    pub fn sync_label(&mut self, animated: bool) {
        let raised = self.focus.get() || !self.input.is_empty();
        self.label.set_raised(raised, animated);
    }
}

impl HasFocus for SearchState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}
