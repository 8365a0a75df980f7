//! Reasons an ability use is rejected before anything is mutated.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{AbilityKey, EntityId};

/// Eligibility failure. `Display` is the human-readable reason returned to
/// the player.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UseError {
    #[error("not slotted")]
    NotSlotted(AbilityKey),

    #[error("ability not found")]
    AbilityNotFound(AbilityKey),

    #[error("passive abilities resolve automatically")]
    PassiveNotUsable(AbilityKey),

    #[error("actor not found")]
    ActorNotFound(EntityId),

    #[error("actor is dead")]
    ActorDead,

    #[error("incapacitated")]
    Incapacitated,

    #[error("skill requirements not met")]
    SkillRequirementsNotMet,

    #[error("prerequisites not met")]
    PrerequisitesNotMet,

    #[error("insufficient AP (need {required}, have {available})")]
    InsufficientAp { required: u32, available: u32 },

    #[error("on cooldown ({remaining} turns)")]
    OnCooldown { remaining: u32 },

    #[error("target required")]
    TargetRequired,

    #[error("target not found")]
    TargetNotFound(EntityId),

    #[error("target is dead")]
    TargetDead(EntityId),

    #[error("target position required")]
    TargetPositionRequired,

    #[error("out of range (distance {distance}, range {range})")]
    OutOfRange { distance: u32, range: u32 },

    #[error("requires low health")]
    LowHealthRequired,
}

impl GameError for UseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotSlotted(_)
            | Self::AbilityNotFound(_)
            | Self::PassiveNotUsable(_)
            | Self::ActorNotFound(_)
            | Self::SkillRequirementsNotMet
            | Self::PrerequisitesNotMet
            | Self::TargetRequired
            | Self::TargetPositionRequired => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotSlotted(_) => "USE_NOT_SLOTTED",
            Self::AbilityNotFound(_) => "USE_ABILITY_NOT_FOUND",
            Self::PassiveNotUsable(_) => "USE_PASSIVE_NOT_USABLE",
            Self::ActorNotFound(_) => "USE_ACTOR_NOT_FOUND",
            Self::ActorDead => "USE_ACTOR_DEAD",
            Self::Incapacitated => "USE_INCAPACITATED",
            Self::SkillRequirementsNotMet => "USE_SKILL_REQUIREMENTS",
            Self::PrerequisitesNotMet => "USE_PREREQUISITES",
            Self::InsufficientAp { .. } => "USE_INSUFFICIENT_AP",
            Self::OnCooldown { .. } => "USE_ON_COOLDOWN",
            Self::TargetRequired => "USE_TARGET_REQUIRED",
            Self::TargetNotFound(_) => "USE_TARGET_NOT_FOUND",
            Self::TargetDead(_) => "USE_TARGET_DEAD",
            Self::TargetPositionRequired => "USE_TARGET_POSITION_REQUIRED",
            Self::OutOfRange { .. } => "USE_OUT_OF_RANGE",
            Self::LowHealthRequired => "USE_LOW_HEALTH_REQUIRED",
        }
    }
}
