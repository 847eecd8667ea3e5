mod floating_label;
mod search_component;
mod state;
mod text_input;

pub use floating_label::{FloatingLabel, LABEL_FRAMES};
pub use search_component::SearchComponent;
pub use state::SearchState;
pub use text_input::TextInputState;
