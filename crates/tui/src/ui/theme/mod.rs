//! Theme styling for the sidebar UI.
//!
//! The sidebar's `theme` attribute selects one of two palettes. Prefer the
//! role-based helpers over hard-coded colors so both palettes stay consistent.

use navtree_types::ThemeName;
use tracing::debug;

pub mod dark;
pub mod helpers;
pub mod light;
pub mod roles;

pub use dark::DarkTheme;
pub use light::LightTheme;
pub use roles::Theme;

/// Build the palette selected by the `theme` attribute.
pub fn load(name: ThemeName) -> Box<dyn Theme> {
    debug!(theme = name.as_str(), "loading sidebar theme");
    match name {
        ThemeName::Light => Box::new(LightTheme::new()),
        ThemeName::Dark => Box::new(DarkTheme::new()),
    }
}
