use std::collections::BTreeMap;

use crate::scaling::ScalingMode;
use crate::state::{SkillKey, StatusKey};

/// Broad category of a status effect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    DamageOverTime,
    MovementDebuff,
    /// The affected entity loses its turns while the effect lasts.
    Incapacitation,
    Buff,
    Debuff,
}

/// When the effect's properties are evaluated.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TickTiming {
    StartOfTurn,
    #[default]
    Persistent,
    OnAction,
    Instant,
}

/// A named, scalable magnitude of a status effect (e.g. `damage`).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusProperty {
    pub base: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling: ScalingMode,
}

/// Interactions enforced when a status is applied or ticks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatusInteractions {
    pub removed_by: Vec<String>,
    pub enhanced_by: Vec<String>,
    pub immunity_from: Vec<String>,
}

/// Catalog entry describing one status effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectDefinition {
    pub key: StatusKey,
    pub kind: StatusKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stackable: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_max_stacks"))]
    pub max_stacks: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_timing: TickTiming,
    #[cfg_attr(feature = "serde", serde(default))]
    pub properties: BTreeMap<String, StatusProperty>,
    /// Skill read by the `skill` scaling mode of the properties.
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling_skill: Option<SkillKey>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub interactions: StatusInteractions,
}

#[cfg(feature = "serde")]
fn default_max_stacks() -> u32 {
    1
}

impl StatusEffectDefinition {
    pub fn new(key: impl Into<StatusKey>, kind: StatusKind) -> Self {
        Self {
            key: key.into(),
            kind,
            stackable: false,
            max_stacks: 1,
            tick_timing: TickTiming::Persistent,
            properties: BTreeMap::new(),
            scaling_skill: None,
            interactions: StatusInteractions::default(),
        }
    }

    pub fn stackable(mut self, max_stacks: u32) -> Self {
        self.stackable = true;
        self.max_stacks = max_stacks;
        self
    }

    pub fn ticking(mut self, timing: TickTiming) -> Self {
        self.tick_timing = timing;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, base: f64, scaling: ScalingMode) -> Self {
        self.properties
            .insert(name.into(), StatusProperty { base, scaling });
        self
    }

    pub fn with_scaling_skill(mut self, skill: impl Into<SkillKey>) -> Self {
        self.scaling_skill = Some(skill.into());
        self
    }

    pub fn is_incapacitating(&self) -> bool {
        self.kind == StatusKind::Incapacitation
    }
}
