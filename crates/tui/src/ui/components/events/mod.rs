mod events_component;
mod state;

pub use events_component::EventsComponent;
pub use state::{EventEntry, EventLogState, MAX_EVENT_ENTRIES};
