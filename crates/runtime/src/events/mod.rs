//! Topic-based event bus for runtime events.
//!
//! Core events are stamped with round, sequence and wall-clock time, then
//! published to the topic they belong to. Consumers subscribe only to the
//! topics they need.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::StampedEvent;
