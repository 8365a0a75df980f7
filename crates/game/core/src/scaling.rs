//! Scaling modes shared by ability effects and status-effect properties.
//!
//! The set is closed: a misspelt mode in content is a registration error,
//! never a silent fall-through to "no scaling".

use crate::state::Entity;

/// Rule by which a base effect value is modified by equipment or skills.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ScalingMode {
    /// `base × average(weapon damage range)`
    Weapon,
    /// `base × shield defense`
    Shield,
    /// `base + primary skill level × 0.1`
    Skill,
    /// `base × average(weapon damage) × (1 + primary skill level × 0.05)`
    WeaponSkill,
    /// `base + strength level × 0.15`
    Strength,
    /// `base`
    #[default]
    None,
}

/// Skill consulted by the `strength` scaling mode.
pub const STRENGTH_SKILL: &str = "strength";

impl ScalingMode {
    /// Applies this mode to `base` using `source`'s equipment and skills.
    ///
    /// `primary_skill` names the skill the `skill` and `weapon_skill` modes
    /// read; with `None` those modes see level 0.
    pub fn apply(self, base: f64, source: &Entity, primary_skill: Option<&str>) -> f64 {
        let primary_level = primary_skill.map_or(0, |skill| source.skills.level(skill));
        let primary_level = f64::from(primary_level);
        match self {
            ScalingMode::Weapon => base * source.equipment.weapon_damage().average(),
            ScalingMode::Shield => base * f64::from(source.equipment.shield_defense()),
            ScalingMode::Skill => base + primary_level * 0.1,
            ScalingMode::WeaponSkill => {
                base * source.equipment.weapon_damage().average() * (1.0 + primary_level * 0.05)
            }
            ScalingMode::Strength => {
                base + f64::from(source.skills.level(STRENGTH_SKILL)) * 0.15
            }
            ScalingMode::None => base,
        }
    }

    /// Modes that make sense for damage-over-time and debuff magnitudes.
    pub fn is_status_compatible(self) -> bool {
        matches!(
            self,
            ScalingMode::None | ScalingMode::Skill | ScalingMode::Strength | ScalingMode::Weapon
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::SkillProgressionTracker;
    use crate::state::{DamageRange, EntityId, Equipment, Shield, Weapon};
    use std::str::FromStr;

    fn equipped() -> Entity {
        let tracker = SkillProgressionTracker::new(["one_handed", "strength"]);
        let mut entity = Entity::player(EntityId(1), "hero").with_equipment(Equipment {
            weapon: Some(Weapon {
                name: "sword".into(),
                damage: DamageRange::new(4, 8),
            }),
            shield: Some(Shield {
                name: "buckler".into(),
                defense: 3,
            }),
        });
        tracker.initialize(&mut entity);
        tracker.bulk_advance(&mut entity, "one_handed", 10).unwrap();
        tracker.bulk_advance(&mut entity, "strength", 20).unwrap();
        entity
    }

    #[test]
    fn every_mode_follows_its_formula() {
        let e = equipped();
        let skill = Some("one_handed");
        assert_eq!(ScalingMode::Weapon.apply(2.0, &e, skill), 12.0);
        assert_eq!(ScalingMode::Shield.apply(2.0, &e, skill), 6.0);
        assert!((ScalingMode::Skill.apply(2.0, &e, skill) - 3.0).abs() < 1e-9);
        assert!((ScalingMode::WeaponSkill.apply(1.0, &e, skill) - 9.0).abs() < 1e-9);
        assert!((ScalingMode::Strength.apply(1.0, &e, skill) - 4.0).abs() < 1e-9);
        assert_eq!(ScalingMode::None.apply(2.5, &e, skill), 2.5);
    }

    #[test]
    fn unarmed_and_unshielded_defaults() {
        let e = Entity::player(EntityId(2), "peasant");
        assert_eq!(ScalingMode::Weapon.apply(2.0, &e, None), 3.0);
        assert_eq!(ScalingMode::Shield.apply(2.0, &e, None), 0.0);
        assert_eq!(ScalingMode::Skill.apply(2.0, &e, None), 2.0);
    }

    #[test]
    fn parses_snake_case_names_only() {
        assert_eq!(ScalingMode::from_str("weapon_skill"), Ok(ScalingMode::WeaponSkill));
        assert!(ScalingMode::from_str("weapn").is_err());
    }
}
