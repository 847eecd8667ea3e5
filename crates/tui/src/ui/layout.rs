//! Mapping from the engine's pixel geometry onto terminal cells.
//!
//! Widths, margins and the mobile breakpoint are configured in pixels. The
//! terminal reports its size in cells, so both directions go through a fixed
//! nominal cell width.

use navtree_types::{Position, RegionMargins};
use ratatui::layout::Rect;

/// Nominal width of one terminal cell in pixels.
pub const CELL_WIDTH_PX: u16 = 8;

pub fn px_to_cells(px: u16) -> u16 {
    px.div_ceil(CELL_WIDTH_PX)
}

pub fn cells_to_px(cells: u16) -> u16 {
    cells.saturating_mul(CELL_WIDTH_PX)
}

/// Rect of a sidebar `width_px` wide docked to `position` inside `area`.
pub fn docked_rect(area: Rect, position: Position, width_px: u16) -> Rect {
    let width = px_to_cells(width_px).min(area.width);
    let x = match position {
        Position::Left => area.x,
        Position::Right => area.x + area.width - width,
    };
    Rect::new(x, area.y, width, area.height)
}

/// Rect of an adjacent region after applying its margins.
pub fn region_rect(area: Rect, margins: RegionMargins) -> Rect {
    let left = px_to_cells(margins.margin_left).min(area.width);
    let right = px_to_cells(margins.margin_right).min(area.width - left);
    Rect::new(area.x + left, area.y, area.width - left - right, area.height)
}
