//! Errors raised by the ability catalog and slot manager.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{AbilityKey, SlotKind};

/// Malformed ability content. Fatal at startup: content must be fixed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("ability `{key}` is missing required field `{field}`")]
    MissingField { key: AbilityKey, field: &'static str },

    #[error("ability `{key}` has invalid type `{value}` (expected `active` or `passive`)")]
    InvalidType { key: AbilityKey, value: String },

    #[error("ability `{key}` declares unknown effect `{effect}`")]
    UnknownEffect { key: AbilityKey, effect: String },

    #[error("ability `{key}` effect `{effect}` uses unknown scaling mode `{scaling}`")]
    UnknownScaling {
        key: AbilityKey,
        effect: String,
        scaling: String,
    },

    #[error("ability `{key}` has unknown tag `{tag}`")]
    UnknownTag { key: AbilityKey, tag: String },

    #[error("ability `{key}` has a step bonus for `{skill}` with levels_per = 0")]
    ZeroStep { key: AbilityKey, skill: String },

    #[error("ability `{0}` is already registered")]
    Duplicate(AbilityKey),
}

impl GameError for RegistrationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Duplicate(_) => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "ABILITY_MISSING_FIELD",
            Self::InvalidType { .. } => "ABILITY_INVALID_TYPE",
            Self::UnknownEffect { .. } => "ABILITY_UNKNOWN_EFFECT",
            Self::UnknownScaling { .. } => "ABILITY_UNKNOWN_SCALING",
            Self::UnknownTag { .. } => "ABILITY_UNKNOWN_TAG",
            Self::ZeroStep { .. } => "ABILITY_ZERO_STEP",
            Self::Duplicate(_) => "ABILITY_DUPLICATE",
        }
    }
}

/// Rejected slot assignment. Nothing is changed when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("{kind} slot index {index} is out of range (capacity {capacity})")]
    IndexOutOfRange {
        kind: SlotKind,
        index: usize,
        capacity: usize,
    },

    #[error("slots cannot be changed right now")]
    SwapLocked,

    #[error("ability `{0}` not found")]
    UnknownAbility(AbilityKey),

    #[error("ability `{ability}` cannot go in a {kind} slot")]
    WrongSlotKind { ability: AbilityKey, kind: SlotKind },
}

impl GameError for SlotError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SwapLocked => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "SLOT_INDEX_OUT_OF_RANGE",
            Self::SwapLocked => "SLOT_SWAP_LOCKED",
            Self::UnknownAbility(_) => "SLOT_UNKNOWN_ABILITY",
            Self::WrongSlotKind { .. } => "SLOT_WRONG_KIND",
        }
    }
}
