//! # Navtree TUI
//!
//! Terminal rendition of the navigation sidebar. The sidebar is docked to one
//! side of the screen and pushes the `main` and `events` regions aside by its
//! effective width, the way the widget adjusts the margins of the page
//! regions next to it. Below the mobile breakpoint it turns into a drawer
//! over a backdrop.
//!
//! ## Architecture
//!
//! - `app`: owns the [`navtree_engine::Sidebar`] plus per-component view state;
//!   every mutation goes through a `SidebarCommand`.
//! - `ui::components`: sidebar (rows, header, footer, flyout), search box
//!   with floating label, main content and the event log.
//! - `ui::runtime`: terminal lifecycle and the async event loop that also
//!   drives item refreshes, polling and debounced resizes.

mod app;
mod ui;

use anyhow::Result;
use navtree_engine::Sidebar;

/// Runs the sidebar TUI until the user quits.
///
/// The sidebar is attached on start and detached on exit, so a configured
/// state store sees the final state.
///
/// # Errors
///
/// Returns an error when the terminal cannot be set up or restored.
pub async fn run(sidebar: Sidebar) -> Result<()> {
    ui::runtime::run_app(sidebar).await
}
