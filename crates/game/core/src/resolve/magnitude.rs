//! Effect magnitude computation.
//!
//! Each declared effect goes through exactly one scaling mode, then receives
//! the ability's additive effectiveness bonus. The bonus is applied to every
//! effect alike, durations and chances included.

use std::collections::BTreeMap;

use crate::ability::{AbilityDefinition, EffectKind};
use crate::state::Entity;

pub fn compute(definition: &AbilityDefinition, actor: &Entity) -> BTreeMap<EffectKind, f64> {
    let primary = definition.primary_skill();
    let bonus = definition.scaling.effectiveness_bonus(actor);
    definition
        .effects
        .iter()
        .map(|(&kind, spec)| {
            let scaled = spec.scaling.apply(spec.base, actor, primary) + bonus;
            (kind, scaled.max(0.0))
        })
        .collect()
}

/// Whole-number part of a magnitude, for integer stats.
pub fn whole(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityCatalog, AbilityDraft, AbilityType};
    use crate::progression::SkillProgressionTracker;
    use crate::scaling::ScalingMode;
    use crate::state::{DamageRange, EntityId, Equipment, Weapon};

    #[test]
    fn scaling_then_effectiveness_then_clamp() {
        let mut catalog = AbilityCatalog::new();
        let def = catalog
            .register(
                "smite",
                AbilityDraft::new("Smite", AbilityType::Active, "combat", 50.0)
                    .requirement("one_handed", 0)
                    .effectiveness("one_handed", 0.5)
                    .effect("damage", 1.0, ScalingMode::Weapon)
                    .effect("healing", 2.0, ScalingMode::Skill)
                    .effect("duration", 0.0, ScalingMode::None),
            )
            .unwrap()
            .clone();

        let tracker = SkillProgressionTracker::new(["one_handed"]);
        let mut hero = Entity::player(EntityId(1), "hero").with_equipment(Equipment {
            weapon: Some(Weapon {
                name: "mace".into(),
                damage: DamageRange::new(2, 6),
            }),
            shield: None,
        });
        tracker.initialize(&mut hero);
        tracker.bulk_advance(&mut hero, "one_handed", 4).unwrap();

        let magnitudes = compute(&def, &hero);
        // 1 × 4 + 4 × 0.5
        assert_eq!(magnitudes[&EffectKind::Damage], 6.0);
        // 2 + 4 × 0.1 + 2
        assert!((magnitudes[&EffectKind::Healing] - 4.4).abs() < 1e-9);
        assert_eq!(magnitudes[&EffectKind::Duration], 2.0);
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        let mut catalog = AbilityCatalog::new();
        let def = catalog
            .register(
                "drain",
                AbilityDraft::new("Drain", AbilityType::Active, "utility", 50.0).effect(
                    "apRecover",
                    -3.0,
                    ScalingMode::None,
                ),
            )
            .unwrap()
            .clone();
        let magnitudes = compute(&def, &Entity::player(EntityId(1), "hero"));
        assert_eq!(magnitudes[&EffectKind::ApRecover], 0.0);
        assert_eq!(whole(-1.0), 0);
        assert_eq!(whole(2.9), 2);
    }
}
