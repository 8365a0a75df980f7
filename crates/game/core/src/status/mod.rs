//! Status-effect catalog and interaction ledger.
//!
//! The ledger is a pure lookup/validation service. It answers stacking and
//! magnitude questions for the resolution engine and never mutates entities.
mod definition;

pub use definition::{
    StatusEffectDefinition, StatusInteractions, StatusKind, StatusProperty, TickTiming,
};

use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Entity, StatusKey};

/// Key of the status applied by the `stunChance` ability effect.
pub const STUNNED: &str = "stunned";

/// Property name read when a status ticks for damage.
pub const DAMAGE_PROPERTY: &str = "damage";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatusRegistrationError {
    #[error("status effect `{0}` is already registered")]
    Duplicate(StatusKey),

    #[error("status effect `{key}` is stackable but max_stacks is 0")]
    ZeroMaxStacks { key: StatusKey },

    #[error("status effect `{key}` property `{property}` uses scaling `{scaling}`, which is not valid for status effects")]
    IncompatibleScaling {
        key: StatusKey,
        property: String,
        scaling: String,
    },
}

impl GameError for StatusRegistrationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate(_) => "STATUS_DUPLICATE",
            Self::ZeroMaxStacks { .. } => "STATUS_ZERO_MAX_STACKS",
            Self::IncompatibleScaling { .. } => "STATUS_INCOMPATIBLE_SCALING",
        }
    }
}

/// Read-only registry of status-effect definitions.
#[derive(Clone, Debug, Default)]
pub struct StatusEffectLedger {
    definitions: BTreeMap<StatusKey, StatusEffectDefinition>,
}

impl StatusEffectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a definition.
    pub fn register(
        &mut self,
        definition: StatusEffectDefinition,
    ) -> Result<(), StatusRegistrationError> {
        if self.definitions.contains_key(&definition.key) {
            return Err(StatusRegistrationError::Duplicate(definition.key));
        }
        if definition.stackable && definition.max_stacks == 0 {
            return Err(StatusRegistrationError::ZeroMaxStacks {
                key: definition.key,
            });
        }
        if let Some((name, property)) = definition
            .properties
            .iter()
            .find(|(_, p)| !p.scaling.is_status_compatible())
        {
            return Err(StatusRegistrationError::IncompatibleScaling {
                key: definition.key.clone(),
                property: name.clone(),
                scaling: property.scaling.to_string(),
            });
        }
        self.definitions.insert(definition.key.clone(), definition);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&StatusEffectDefinition> {
        self.definitions.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    /// Whether one more stack may be added on top of `current_stacks`.
    ///
    /// Unknown effects never stack.
    pub fn can_stack(&self, key: &str, current_stacks: u32) -> bool {
        match self.definitions.get(key) {
            Some(def) if def.stackable => current_stacks < def.max_stacks,
            Some(_) => current_stacks == 0,
            None => false,
        }
    }

    /// Resolves `property` of `key` against `source` using the property's scaling mode.
    ///
    /// Returns `None` if the effect or property is unknown. Never negative.
    pub fn calculate_strength(&self, key: &str, property: &str, source: &Entity) -> Option<f64> {
        let definition = self.definitions.get(key)?;
        let prop = definition.properties.get(property)?;
        let value = prop
            .scaling
            .apply(prop.base, source, definition.scaling_skill.as_deref());
        Some(value.max(0.0))
    }

    pub fn is_incapacitating(&self, key: &str) -> bool {
        self.definitions
            .get(key)
            .is_some_and(StatusEffectDefinition::is_incapacitating)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::SkillProgressionTracker;
    use crate::scaling::ScalingMode;
    use crate::state::EntityId;

    fn ledger() -> StatusEffectLedger {
        let mut ledger = StatusEffectLedger::new();
        ledger
            .register(StatusEffectDefinition::new(STUNNED, StatusKind::Incapacitation))
            .unwrap();
        ledger
            .register(
                StatusEffectDefinition::new("poisoned", StatusKind::DamageOverTime)
                    .stackable(3)
                    .ticking(TickTiming::StartOfTurn)
                    .with_property(DAMAGE_PROPERTY, 2.0, ScalingMode::Skill)
                    .with_scaling_skill("alchemy"),
            )
            .unwrap();
        ledger
    }

    #[test]
    fn stacking_respects_limits() {
        let ledger = ledger();
        assert!(ledger.can_stack("poisoned", 0));
        assert!(ledger.can_stack("poisoned", 2));
        assert!(!ledger.can_stack("poisoned", 3));
        assert!(ledger.can_stack(STUNNED, 0));
        assert!(!ledger.can_stack(STUNNED, 1));
        assert!(!ledger.can_stack("unknown", 0));
    }

    #[test]
    fn strength_scales_with_source_skill() {
        let ledger = ledger();
        let tracker = SkillProgressionTracker::new(["alchemy"]);
        let mut source = Entity::enemy(
            EntityId(3),
            "spider",
            crate::state::EnemyProfile {
                tier: 1,
                role: crate::state::EnemyRole::Skirmisher,
            },
        );
        tracker.initialize(&mut source);
        tracker.bulk_advance(&mut source, "alchemy", 20).unwrap();

        let strength = ledger
            .calculate_strength("poisoned", DAMAGE_PROPERTY, &source)
            .unwrap();
        assert!((strength - 4.0).abs() < 1e-9);
        assert_eq!(ledger.calculate_strength("poisoned", "slow", &source), None);
    }

    #[test]
    fn rejects_duplicates_and_bad_scaling() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.register(StatusEffectDefinition::new(STUNNED, StatusKind::Incapacitation)),
            Err(StatusRegistrationError::Duplicate(STUNNED.into()))
        );
        let err = ledger
            .register(
                StatusEffectDefinition::new("warded", StatusKind::Buff).with_property(
                    "absorb",
                    1.0,
                    ScalingMode::Shield,
                ),
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "STATUS_INCOMPATIBLE_SCALING");
    }

    #[test]
    fn incapacitation_is_reported() {
        let ledger = ledger();
        assert!(ledger.is_incapacitating(STUNNED));
        assert!(!ledger.is_incapacitating("poisoned"));
    }
}
