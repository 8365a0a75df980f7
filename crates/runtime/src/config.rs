//! Runtime configuration.

use serde::{Deserialize, Serialize};
use tactics_core::CombatConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Replaces the content's combat tuning when set.
    pub combat: Option<CombatConfig>,
    /// Seed for the combat dice. A random seed is drawn when absent.
    pub rng_seed: Option<u64>,
    /// Per-topic capacity of the event bus.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: None,
            rng_seed: None,
            event_capacity: 256,
        }
    }
}

impl RuntimeConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = Some(combat);
        self
    }

    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.rng_seed.unwrap_or_else(rand::random)
    }
}
