use std::collections::BTreeMap;

use crate::ability::EffectKind;
use crate::event::EffectDelta;
use crate::progression::LevelUp;
use crate::state::{AbilityKey, EntityId, Position};

/// One invocation of an ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseRequest {
    pub actor: EntityId,
    pub ability: AbilityKey,
    pub target: Option<EntityId>,
    pub target_position: Option<Position>,
}

impl UseRequest {
    pub fn new(actor: EntityId, ability: impl Into<AbilityKey>) -> Self {
        Self {
            actor,
            ability: ability.into(),
            target: None,
            target_position: None,
        }
    }

    pub fn on(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.target_position = Some(position);
        self
    }
}

/// Audit record of a resolved (or failed) use.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityOutcome {
    pub ability: AbilityKey,
    pub success: bool,
    /// Percentile roll; `None` for passives, which always resolve.
    pub roll: Option<f64>,
    pub success_rate: f64,
    pub ap_spent: u32,
    /// Scaled magnitudes, empty when the roll failed.
    pub magnitudes: BTreeMap<EffectKind, f64>,
    pub effects: Vec<EffectDelta>,
    pub level_ups: Vec<LevelUp>,
    pub deaths: Vec<EntityId>,
}

impl AbilityOutcome {
    /// Total damage dealt across all damage effects.
    pub fn damage_dealt(&self) -> f64 {
        self.effects
            .iter()
            .filter(|d| d.effect == EffectKind::Damage)
            .map(|d| d.amount)
            .sum()
    }
}
