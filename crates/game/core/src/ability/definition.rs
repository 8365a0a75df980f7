//! Immutable ability definitions and the raw registration input they are
//! validated from.

use std::collections::BTreeMap;

use crate::config::CombatConfig;
use crate::scaling::ScalingMode;
use crate::state::{AbilityKey, Entity, SkillKey, StatusKey};

/// Whether an ability is used explicitly or always resolves.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityType {
    Active,
    Passive,
}

/// Effects an ability may declare. Unknown names are rejected at registration.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum EffectKind {
    Damage,
    Healing,
    Movement,
    StunChance,
    StunDuration,
    Knockback,
    DefenseBonus,
    Duration,
    ApRecover,
    ArmorPiercing,
}

/// Base value and scaling rule of one declared effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub base: f64,
    pub scaling: ScalingMode,
}

impl EffectSpec {
    pub const fn new(base: f64, scaling: ScalingMode) -> Self {
        Self { base, scaling }
    }

    pub const fn flat(base: f64) -> Self {
        Self::new(base, ScalingMode::None)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillRequirement {
    pub skill: SkillKey,
    pub min_level: u32,
}

impl SkillRequirement {
    pub fn new(skill: impl Into<SkillKey>, min_level: u32) -> Self {
        Self {
            skill: skill.into(),
            min_level,
        }
    }
}

/// `skill level × multiplier` added to the success rate and effect values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillMultiplier {
    pub skill: SkillKey,
    pub multiplier: f64,
}

impl SkillMultiplier {
    pub fn new(skill: impl Into<SkillKey>, multiplier: f64) -> Self {
        Self {
            skill: skill.into(),
            multiplier,
        }
    }
}

/// Step table entry: `floor(skill level / levels_per) × amount`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepBonus {
    pub skill: SkillKey,
    pub levels_per: u32,
    pub amount: u32,
}

impl StepBonus {
    pub fn new(skill: impl Into<SkillKey>, levels_per: u32, amount: u32) -> Self {
        Self {
            skill: skill.into(),
            levels_per,
            amount,
        }
    }

    fn bonus(&self, entity: &Entity) -> u32 {
        if self.levels_per == 0 {
            return 0;
        }
        (entity.skills.level(&self.skill) / self.levels_per).saturating_mul(self.amount)
    }
}

/// Status applied on a resolved use: to the target, or to the user when the
/// ability has none.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusInfliction {
    pub status: StatusKey,
    /// Percentage, compared against a percentile roll.
    #[cfg_attr(feature = "serde", serde(default = "always"))]
    pub chance: f64,
    pub duration: u32,
}

#[cfg(feature = "serde")]
fn always() -> f64 {
    100.0
}

impl StatusInfliction {
    pub fn new(status: impl Into<StatusKey>, chance: f64, duration: u32) -> Self {
        Self {
            status: status.into(),
            chance,
            duration,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityScaling {
    pub effectiveness: Vec<SkillMultiplier>,
    pub ap_reduction: Vec<StepBonus>,
    pub range_increase: Vec<StepBonus>,
}

impl AbilityScaling {
    /// Σ skill level × multiplier over the effectiveness list.
    pub fn effectiveness_bonus(&self, entity: &Entity) -> f64 {
        self.effectiveness
            .iter()
            .map(|m| f64::from(entity.skills.level(&m.skill)) * m.multiplier)
            .sum()
    }
}

bitflags::bitflags! {
    /// Optional behaviour tags. Content names them in snake_case.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AbilityTags: u8 {
        /// Usable only at or below a quarter of max health.
        const LOW_HEALTH_ONLY = 1 << 0;
        const MELEE = 1 << 1;
        const RANGED = 1 << 2;
        /// Picked by the auto-play policy as the fallback attack.
        const BASIC = 1 << 3;
    }
}

impl AbilityTags {
    /// Parses a snake_case tag name such as `low_health_only`.
    pub fn parse_tag(tag: &str) -> Option<Self> {
        Self::from_name(&tag.to_ascii_uppercase())
    }
}

/// A validated, immutable catalog entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AbilityDefinition {
    pub key: AbilityKey,
    pub name: String,
    pub description: String,
    pub ability_type: AbilityType,
    pub category: String,
    pub ap_cost: u32,
    /// Manhattan distance; 0 means self / no target.
    pub range: u32,
    pub cooldown: u32,
    pub requires_target: bool,
    pub requirements: Vec<SkillRequirement>,
    pub prerequisites: Vec<AbilityKey>,
    /// Percentage; may be negative before scaling.
    pub base_success_rate: f64,
    pub effects: BTreeMap<EffectKind, EffectSpec>,
    pub scaling: AbilityScaling,
    pub inflicts: Vec<StatusInfliction>,
    pub tags: AbilityTags,
}

impl AbilityDefinition {
    pub fn is_active(&self) -> bool {
        self.ability_type == AbilityType::Active
    }

    /// Passives, and actives authored at 100% or more, skip the success
    /// roll. The reported success rate is still clamped.
    pub fn always_resolves(&self) -> bool {
        !self.is_active() || self.base_success_rate >= 100.0
    }

    pub fn effect(&self, kind: EffectKind) -> Option<&EffectSpec> {
        self.effects.get(&kind)
    }

    /// Skill the `skill` / `weapon_skill` scaling modes read: the first
    /// requirement, else the first effectiveness entry.
    pub fn primary_skill(&self) -> Option<&str> {
        self.requirements
            .first()
            .map(|r| r.skill.as_str())
            .or_else(|| self.scaling.effectiveness.first().map(|m| m.skill.as_str()))
    }

    pub fn meets_skill_requirements(&self, entity: &Entity) -> bool {
        self.requirements
            .iter()
            .all(|r| entity.skills.level(&r.skill) >= r.min_level)
    }

    pub fn meets_prerequisites(&self, entity: &Entity) -> bool {
        self.prerequisites
            .iter()
            .all(|p| entity.unlocked_abilities.contains(p))
    }

    /// `clamp(base + Σ level × multiplier, 5, 95)`.
    pub fn success_rate_for(&self, entity: &Entity) -> f64 {
        (self.base_success_rate + self.scaling.effectiveness_bonus(entity)).clamp(
            CombatConfig::MIN_SUCCESS_RATE,
            CombatConfig::MAX_SUCCESS_RATE,
        )
    }

    /// AP cost after skill reductions. Never below 1 for a nonzero base cost.
    pub fn ap_cost_for(&self, entity: &Entity) -> u32 {
        if self.ap_cost == 0 {
            return 0;
        }
        let reduction = self
            .scaling
            .ap_reduction
            .iter()
            .fold(0u32, |total, s| total.saturating_add(s.bonus(entity)));
        self.ap_cost.saturating_sub(reduction).max(1)
    }

    pub fn range_for(&self, entity: &Entity) -> u32 {
        self.scaling
            .range_increase
            .iter()
            .fold(self.range, |range, s| range.saturating_add(s.bonus(entity)))
    }
}

/// Raw ability record as authored in content, before validation.
///
/// Every field is optional so that missing required fields can be reported
/// precisely instead of failing deserialization.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ability_type: Option<String>,
    pub category: Option<String>,
    pub ap_cost: Option<u32>,
    pub range: Option<u32>,
    pub cooldown: Option<u32>,
    pub requires_target: Option<bool>,
    pub requirements: Option<Vec<SkillRequirement>>,
    pub prerequisites: Option<Vec<AbilityKey>>,
    pub base_success_rate: Option<f64>,
    pub effects: Option<BTreeMap<String, EffectDraft>>,
    pub scaling: Option<AbilityScaling>,
    pub inflicts: Option<Vec<StatusInfliction>>,
    pub tags: Option<Vec<String>>,
}

/// Raw effect entry; `scaling` defaults to `none`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDraft {
    pub base: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling: Option<String>,
}

impl AbilityDraft {
    /// Starts a draft with every required field filled in.
    pub fn new(
        name: impl Into<String>,
        ability_type: AbilityType,
        category: impl Into<String>,
        base_success_rate: f64,
    ) -> Self {
        let name = name.into();
        Self {
            description: Some(name.clone()),
            name: Some(name),
            ability_type: Some(ability_type.to_string()),
            category: Some(category.into()),
            base_success_rate: Some(base_success_rate),
            ..Self::default()
        }
    }

    pub fn ap_cost(mut self, cost: u32) -> Self {
        self.ap_cost = Some(cost);
        self
    }

    pub fn range(mut self, range: u32) -> Self {
        self.range = Some(range);
        self
    }

    pub fn cooldown(mut self, turns: u32) -> Self {
        self.cooldown = Some(turns);
        self
    }

    pub fn requires_target(mut self) -> Self {
        self.requires_target = Some(true);
        self
    }

    pub fn requirement(mut self, skill: impl Into<SkillKey>, min_level: u32) -> Self {
        self.requirements
            .get_or_insert_with(Vec::new)
            .push(SkillRequirement::new(skill, min_level));
        self
    }

    pub fn prerequisite(mut self, ability: impl Into<AbilityKey>) -> Self {
        self.prerequisites
            .get_or_insert_with(Vec::new)
            .push(ability.into());
        self
    }

    pub fn effect(mut self, name: impl Into<String>, base: f64, scaling: ScalingMode) -> Self {
        self.effects.get_or_insert_with(BTreeMap::new).insert(
            name.into(),
            EffectDraft {
                base,
                scaling: Some(scaling.to_string()),
            },
        );
        self
    }

    pub fn effectiveness(mut self, skill: impl Into<SkillKey>, multiplier: f64) -> Self {
        self.scaling
            .get_or_insert_with(AbilityScaling::default)
            .effectiveness
            .push(SkillMultiplier::new(skill, multiplier));
        self
    }

    pub fn ap_reduction(mut self, skill: impl Into<SkillKey>, levels_per: u32, amount: u32) -> Self {
        self.scaling
            .get_or_insert_with(AbilityScaling::default)
            .ap_reduction
            .push(StepBonus::new(skill, levels_per, amount));
        self
    }

    pub fn range_increase(
        mut self,
        skill: impl Into<SkillKey>,
        levels_per: u32,
        amount: u32,
    ) -> Self {
        self.scaling
            .get_or_insert_with(AbilityScaling::default)
            .range_increase
            .push(StepBonus::new(skill, levels_per, amount));
        self
    }

    pub fn inflicts(mut self, status: impl Into<StatusKey>, chance: f64, duration: u32) -> Self {
        self.inflicts
            .get_or_insert_with(Vec::new)
            .push(StatusInfliction::new(status, chance, duration));
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }
}
