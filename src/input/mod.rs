pub mod events;
pub mod hover;

// Re-export the essential types
pub use events::PointerEvent;
pub use hover::{HoverResolver, HoverState};
