//! Entity and encounter state mutated by the combat rules.
//!
//! Everything here is plain data. The rules that mutate it live in
//! [`crate::progression`], [`crate::ability`], [`crate::resolve`] and
//! [`crate::turn`].
mod common;
mod entity;
mod roster;
mod skills;
mod slots;
mod statuses;
mod turn;

pub use common::{EntityId, Position, ResourceMeter, Side};
pub use entity::{
    CombatStats, DamageRange, EnemyProfile, EnemyRole, Entity, Equipment, Shield, Weapon,
};
pub use roster::Roster;
pub use skills::{SkillRecord, SkillSet};
pub use slots::{AbilitySlots, SlotKind};
pub use statuses::{ActiveStatus, ModifiedStat, StatusEffects, TimedModifier, TimedModifiers};
pub use turn::{CombatPhase, TurnEntry, TurnState};

/// Catalog key of an ability (e.g. `"basic_attack"`).
pub type AbilityKey = String;

/// Key of a skill tracked by the progression system (e.g. `"one_handed"`).
pub type SkillKey = String;

/// Catalog key of a status effect (e.g. `"stunned"`).
pub type StatusKey = String;
