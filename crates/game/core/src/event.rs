//! Structured events produced by the combat rules.
//!
//! Core functions never broadcast anything themselves. They push events into
//! an [`EventSink`] supplied by the caller; the runtime timestamps and
//! publishes them.

use crate::ability::EffectKind;
use crate::state::{AbilityKey, EntityId, Position, Side, SkillKey, StatusKey};

/// Which side won an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

/// Numeric result of one applied effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDelta {
    pub effect: EffectKind,
    pub entity: EntityId,
    /// Magnitude actually applied (damage dealt, health restored, tiles moved...).
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CombatEvent {
    AbilityUsed {
        entity: EntityId,
        ability: AbilityKey,
        target: Option<EntityId>,
        roll: Option<f64>,
        success_rate: f64,
        ap_spent: u32,
        effects: Vec<EffectDelta>,
    },
    AbilityFailed {
        entity: EntityId,
        ability: AbilityKey,
        roll: f64,
        success_rate: f64,
        ap_spent: u32,
    },
    EntityDied {
        entity: EntityId,
        killer: Option<EntityId>,
    },
    #[cfg_attr(feature = "serde", serde(rename = "CHARACTER_SKILL_GAINED"))]
    SkillGained {
        entity: EntityId,
        skill: SkillKey,
        old_level: u32,
        new_level: u32,
    },
    TurnStarted {
        entity: EntityId,
        round: u32,
        action_points: u32,
    },
    TurnEnded {
        entity: EntityId,
        round: u32,
    },
    CombatStarted {
        order: Vec<(EntityId, i32)>,
    },
    CombatEnded {
        outcome: CombatOutcome,
        survivors: Vec<(Side, usize)>,
    },
    StatusApplied {
        entity: EntityId,
        status: StatusKey,
        stacks: u32,
        remaining: u32,
    },
    StatusTicked {
        entity: EntityId,
        status: StatusKey,
        damage: u32,
    },
    EnemyAttacked {
        entity: EntityId,
        target: EntityId,
        damage: u32,
    },
    EnemyMoved {
        entity: EntityId,
        from: Position,
        to: Position,
    },
}

impl CombatEvent {
    /// Stable upper-case name used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AbilityUsed { .. } => "ABILITY_USED",
            Self::AbilityFailed { .. } => "ABILITY_FAILED",
            Self::EntityDied { .. } => "ENTITY_DIED",
            Self::SkillGained { .. } => "CHARACTER_SKILL_GAINED",
            Self::TurnStarted { .. } => "TURN_STARTED",
            Self::TurnEnded { .. } => "TURN_ENDED",
            Self::CombatStarted { .. } => "COMBAT_STARTED",
            Self::CombatEnded { .. } => "COMBAT_ENDED",
            Self::StatusApplied { .. } => "STATUS_APPLIED",
            Self::StatusTicked { .. } => "STATUS_TICKED",
            Self::EnemyAttacked { .. } => "ENEMY_ATTACKED",
            Self::EnemyMoved { .. } => "ENEMY_MOVED",
        }
    }
}

/// Output channel for combat events.
pub trait EventSink {
    fn emit(&mut self, event: CombatEvent);
}

impl EventSink for Vec<CombatEvent> {
    fn emit(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: CombatEvent) {
        (**self).emit(event);
    }
}

/// Discards everything. Useful for dry runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: CombatEvent) {}
}
