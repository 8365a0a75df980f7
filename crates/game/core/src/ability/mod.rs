//! Ability definitions, the catalog that validates them, and slot assignment.
//!
//! The catalog is built once (normally by the content loader) and shared by
//! reference with the slot manager, the resolution engine and the scheduler.
mod catalog;
mod definition;
mod error;
mod slots;

pub use catalog::{AbilityCatalog, UnlockedAbility};
pub use definition::{
    AbilityDefinition, AbilityDraft, AbilityScaling, AbilityTags, AbilityType, EffectDraft,
    EffectKind, EffectSpec, SkillMultiplier, SkillRequirement, StatusInfliction, StepBonus,
};
pub use error::{RegistrationError, SlotError};
pub use slots::AbilitySlotManager;
