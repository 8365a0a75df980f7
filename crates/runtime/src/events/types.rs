//! Envelope published on the bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tactics_core::CombatEvent;

use super::Topic;

/// A core event stamped with its place in the encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampedEvent {
    /// Encounter round the event happened in; 0 outside combat.
    pub round: u32,
    /// Monotonic per-orchestrator counter.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub event: CombatEvent,
}

impl StampedEvent {
    pub fn new(round: u32, sequence: u64, event: CombatEvent) -> Self {
        Self {
            round,
            sequence,
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn topic(&self) -> Topic {
        Topic::of(&self.event)
    }
}
