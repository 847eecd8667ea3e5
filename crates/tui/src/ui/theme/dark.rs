//! Dark palette: midnight-blue panels with light text.

use ratatui::style::Color;

use super::helpers::{darken_rgb, lighten_rgb};
use super::roles::{Theme, ThemeRoles};

pub const MIDNIGHT: Color = Color::Rgb(0x2C, 0x3E, 0x50); // #2C3E50
pub const NAVY: Color = Color::Rgb(0x34, 0x49, 0x5E); // #34495E
pub const CLOUD: Color = Color::Rgb(0xEC, 0xF0, 0xF1); // #ECF0F1
pub const SILVER: Color = Color::Rgb(0xBD, 0xC3, 0xC7); // #BDC3C7
pub const ASH: Color = Color::Rgb(0x95, 0xA5, 0xA6); // #95A5A6
pub const SKY: Color = Color::Rgb(0x34, 0x98, 0xDB); // #3498DB
pub const TEAL: Color = Color::Rgb(0x1A, 0xBC, 0x9C); // #1ABC9C

pub const RED: Color = Color::Rgb(0xE7, 0x4C, 0x3C); // #E74C3C
pub const AMBER: Color = Color::Rgb(0xF3, 0x9C, 0x12); // #F39C12
pub const GREEN: Color = Color::Rgb(0x2E, 0xCC, 0x71); // #2ECC71

fn build_dark_roles() -> ThemeRoles {
    ThemeRoles {
        background: darken_rgb(MIDNIGHT, 0.70),
        surface: MIDNIGHT,
        surface_muted: NAVY,
        border: lighten_rgb(NAVY, 0.10),
        divider: lighten_rgb(NAVY, 0.25),

        text: CLOUD,
        text_secondary: SILVER,
        text_muted: ASH,

        accent_primary: SKY,
        accent_secondary: TEAL,

        info: SKY,
        success: GREEN,
        warning: AMBER,
        error: RED,

        selection_bg: NAVY,
        selection_fg: CLOUD,
        focus: SKY,

        modal_bg: darken_rgb(MIDNIGHT, 0.40),
    }
}

#[derive(Debug, Clone)]
pub struct DarkTheme {
    roles: ThemeRoles,
}

impl DarkTheme {
    pub fn new() -> Self {
        Self {
            roles: build_dark_roles(),
        }
    }
}

impl Default for DarkTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for DarkTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
