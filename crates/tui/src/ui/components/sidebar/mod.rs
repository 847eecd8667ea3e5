mod sidebar_component;
mod state;

pub use sidebar_component::SidebarComponent;
pub use state::{FlyoutState, SidebarViewState};
