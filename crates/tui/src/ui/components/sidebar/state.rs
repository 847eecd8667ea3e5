use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

use crate::ui::components::find_target_index_by_mouse_position;

/// Open flyout of a collapsed sidebar: the children of one top-level item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlyoutState {
    pub parent_id: String,
    /// Index into the flyout entries.
    pub cursor: usize,
}

/// Visual state of the item list.
///
/// Tree state (expansion, active id, query) lives in the sidebar itself;
/// this only tracks what the terminal view needs on top of it: the keyboard
/// cursor, scroll offset, the open flyout and the hit-test areas of the last
/// frame.
#[derive(Debug, Clone)]
pub struct SidebarViewState {
    /// Index into the visible rows.
    pub cursor: usize,
    /// First visible row.
    pub offset: usize,
    pub flyout: Option<FlyoutState>,
    pub focus: FocusFlag,
    /// Last rendered area of the whole sidebar.
    pub last_area: Rect,
    /// Area of the item list inside the sidebar.
    pub list_area: Rect,
    /// Row areas of the last frame, keyed by item id.
    pub row_areas: Vec<(String, Rect)>,
    pub flyout_area: Rect,
    pub flyout_row_areas: Vec<(String, Rect)>,
    /// Collapse toggle in the header, when rendered.
    pub toggle_area: Option<Rect>,
}

impl Default for SidebarViewState {
    fn default() -> Self {
        Self {
            cursor: 0,
            offset: 0,
            flyout: None,
            focus: FocusFlag::named("sidebar.tree"),
            last_area: Rect::default(),
            list_area: Rect::default(),
            row_areas: Vec::new(),
            flyout_area: Rect::default(),
            flyout_row_areas: Vec::new(),
            toggle_area: None,
        }
    }
}

impl SidebarViewState {
    /// Keep the cursor inside `len` rows.
    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
        self.offset = self.offset.min(self.cursor);
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// Adjust the scroll offset so the cursor stays within `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }

    pub fn open_flyout(&mut self, parent_id: impl Into<String>) {
        self.flyout = Some(FlyoutState {
            parent_id: parent_id.into(),
            cursor: 0,
        });
    }

    pub fn close_flyout(&mut self) {
        self.flyout = None;
        self.flyout_area = Rect::default();
        self.flyout_row_areas.clear();
    }

    pub fn is_flyout_open(&self) -> bool {
        self.flyout.is_some()
    }

    /// Row under the given terminal position.
    pub fn row_at(&self, column: u16, row: u16) -> Option<(usize, &str)> {
        let areas: Vec<Rect> = self.row_areas.iter().map(|(_, area)| *area).collect();
        let index = find_target_index_by_mouse_position(&self.list_area, &areas, column, row)?;
        self.row_areas.get(index).map(|(id, _)| (index, id.as_str()))
    }

    /// Flyout entry under the given terminal position.
    pub fn flyout_entry_at(&self, column: u16, row: u16) -> Option<(usize, &str)> {
        let areas: Vec<Rect> = self.flyout_row_areas.iter().map(|(_, area)| *area).collect();
        let index = find_target_index_by_mouse_position(&self.flyout_area, &areas, column, row)?;
        self.flyout_row_areas.get(index).map(|(id, _)| (index, id.as_str()))
    }

    pub fn hits_toggle(&self, column: u16, row: u16) -> bool {
        self.toggle_area
            .is_some_and(|area| find_target_index_by_mouse_position(&area, &[area], column, row).is_some())
    }
}

impl HasFocus for SidebarViewState {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_in_bounds() {
        let mut state = SidebarViewState::default();
        state.move_up();
        assert_eq!(state.cursor, 0);
        state.move_down(2);
        state.move_down(2);
        assert_eq!(state.cursor, 1);
        state.clamp_cursor(1);
        assert_eq!(state.cursor, 0);
        state.clamp_cursor(0);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn scrolling_follows_the_cursor() {
        let mut state = SidebarViewState {
            cursor: 7,
            ..SidebarViewState::default()
        };
        state.ensure_visible(5);
        assert_eq!(state.offset, 3);
        state.cursor = 1;
        state.ensure_visible(5);
        assert_eq!(state.offset, 1);
    }

    #[test]
    fn hit_tests_use_recorded_row_areas() {
        let mut state = SidebarViewState {
            list_area: Rect::new(0, 2, 20, 4),
            ..SidebarViewState::default()
        };
        state.row_areas = vec![
            ("dashboard".into(), Rect::new(0, 2, 20, 1)),
            ("users".into(), Rect::new(0, 3, 20, 1)),
        ];
        assert_eq!(state.row_at(5, 3), Some((1, "users")));
        assert_eq!(state.row_at(5, 5), None);
        assert_eq!(state.row_at(30, 2), None);

        state.toggle_area = Some(Rect::new(18, 0, 2, 1));
        assert!(state.hits_toggle(19, 0));
        assert!(!state.hits_toggle(10, 0));
    }
}
