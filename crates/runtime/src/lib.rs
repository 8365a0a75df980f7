//! Runtime orchestration for tactical encounters.
//!
//! This crate wraps the pure combat rules in a stateful coordinator that
//! hosts drive with JSON-friendly requests. Consumers embed
//! [`CombatOrchestrator`] to run encounters and subscribe to stamped events
//! through its [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`orchestrator`] hosts the coordinator, its requests and snapshots
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`config`] and [`error`] carry runtime settings and failures
pub mod config;
pub mod error;
pub mod events;
pub mod orchestrator;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use events::{EventBus, StampedEvent, Topic};
pub use orchestrator::{
    ActionResponse, CombatAction, CombatOrchestrator, CombatSnapshot, EntitySnapshot,
    StatusSnapshot,
};
