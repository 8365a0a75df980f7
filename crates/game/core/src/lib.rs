//! Deterministic tactical-combat rules shared by the runtime and offline tools.
//!
//! `tactics-core` owns the canonical rules: skill progression, the ability
//! catalog and slots, ability resolution, status effects and the turn
//! scheduler with its enemy AI. Every API is pure. Randomness comes in
//! through [`rng::Dice`], map knowledge through [`oracle::PositionOracle`],
//! and everything that happened goes out through [`event::EventSink`].
pub mod ability;
pub mod config;
pub mod error;
pub mod event;
pub mod oracle;
pub mod progression;
pub mod resolve;
pub mod rng;
pub mod scaling;
pub mod state;
pub mod status;
pub mod turn;

pub use ability::{
    AbilityCatalog, AbilityDefinition, AbilityDraft, AbilitySlotManager, AbilityType, EffectKind,
    RegistrationError, SlotError, UnlockedAbility,
};
pub use config::CombatConfig;
pub use error::{ErrorSeverity, GameError};
pub use event::{CombatEvent, CombatOutcome, EffectDelta, EventSink, NullSink};
pub use oracle::{OpenField, PositionOracle, RoomBounds};
pub use progression::{Award, LevelUp, ProgressionError, SkillProgressionTracker};
pub use resolve::{AbilityOutcome, AbilityResolutionEngine, ResolveContext, UseError, UseRequest};
pub use rng::{Dice, PcgDice, ScriptedDice, ScriptedRoll};
pub use scaling::ScalingMode;
pub use state::{
    AbilityKey, CombatPhase, CombatStats, DamageRange, EnemyProfile, EnemyRole, Entity, EntityId,
    Equipment, Position, ResourceMeter, Roster, Shield, Side, SkillKey, SlotKind, StatusKey,
    TurnState, Weapon,
};
pub use status::{StatusEffectDefinition, StatusEffectLedger, StatusKind, StatusRegistrationError};
pub use turn::{EncounterSummary, TurnError, TurnProgress, TurnScheduler, TurnStart};
