mod content_component;

pub use content_component::ContentComponent;
