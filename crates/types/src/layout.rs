//! Layout side effects computed for regions adjacent to the sidebar.

use serde::{Deserialize, Serialize};

use crate::config::Position;

/// Viewport widths at or below this value are treated as mobile.
pub const MOBILE_BREAKPOINT: u16 = 768;

/// Result of one layout computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub position: Position,
    pub collapsed: bool,
    /// Effective sidebar width for the current collapse state.
    pub width: u16,
    pub margin_left: u16,
    pub margin_right: u16,
    pub is_mobile: bool,
}

/// Margins applied to one adjacent region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionMargins {
    pub margin_left: u16,
    pub margin_right: u16,
}

impl RegionMargins {
    pub const ZERO: RegionMargins = RegionMargins {
        margin_left: 0,
        margin_right: 0,
    };
}

impl From<&LayoutInfo> for RegionMargins {
    fn from(info: &LayoutInfo) -> Self {
        if info.is_mobile {
            return RegionMargins::ZERO;
        }
        RegionMargins {
            margin_left: info.margin_left,
            margin_right: info.margin_right,
        }
    }
}
