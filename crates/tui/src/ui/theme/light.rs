//! Light palette: white panels, charcoal text and a blue accent.

use ratatui::style::Color;

use super::helpers::darken_rgb;
use super::roles::{Theme, ThemeRoles};

pub const WHITE: Color = Color::Rgb(0xFF, 0xFF, 0xFF); // #FFFFFF
pub const PAPER: Color = Color::Rgb(0xF5, 0xF5, 0xF5); // #F5F5F5
pub const MIST: Color = Color::Rgb(0xE0, 0xE0, 0xE0); // #E0E0E0
pub const ICE: Color = Color::Rgb(0xE3, 0xF2, 0xFD); // #E3F2FD
pub const SILVER: Color = Color::Rgb(0xBD, 0xC3, 0xC7); // #BDC3C7
pub const CHARCOAL: Color = Color::Rgb(0x33, 0x33, 0x33); // #333333
pub const SLATE: Color = Color::Rgb(0x2C, 0x3E, 0x50); // #2C3E50
pub const STEEL: Color = Color::Rgb(0x7F, 0x8C, 0x8D); // #7F8C8D
pub const BLUE: Color = Color::Rgb(0x19, 0x76, 0xD2); // #1976D2
pub const SKY: Color = Color::Rgb(0x34, 0x98, 0xDB); // #3498DB

pub const RED: Color = Color::Rgb(0xC0, 0x39, 0x2B); // #C0392B
pub const ORANGE: Color = Color::Rgb(0xD3, 0x54, 0x00); // #D35400
pub const GREEN: Color = Color::Rgb(0x27, 0xAE, 0x60); // #27AE60

fn build_light_roles() -> ThemeRoles {
    ThemeRoles {
        background: PAPER,
        surface: WHITE,
        surface_muted: ICE,
        border: MIST,
        divider: SILVER,

        text: CHARCOAL,
        text_secondary: SLATE,
        text_muted: STEEL,

        accent_primary: BLUE,
        accent_secondary: SKY,

        info: SKY,
        success: GREEN,
        warning: ORANGE,
        error: RED,

        selection_bg: ICE,
        selection_fg: SLATE,
        focus: SKY,

        modal_bg: darken_rgb(PAPER, 0.55),
    }
}

#[derive(Debug, Clone)]
pub struct LightTheme {
    roles: ThemeRoles,
}

impl LightTheme {
    pub fn new() -> Self {
        Self {
            roles: build_light_roles(),
        }
    }
}

impl Default for LightTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for LightTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
