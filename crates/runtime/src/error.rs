//! Unified error types surfaced by the runtime API.
//!
//! Core rejections pass through unchanged so callers keep the typed reason;
//! the rest are orchestration failures.
use tactics_core::{EntityId, ErrorSeverity, GameError, Position, TurnError, UseError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("an encounter is already active")]
    EncounterActive,

    #[error("no encounter is active")]
    NoEncounter,

    #[error("no living party members")]
    NoLivingParty,

    #[error("no enemies to fight")]
    NoEnemies,

    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("entity {0} is already in the roster")]
    DuplicateEntity(EntityId),

    #[error("failed to spawn '{key}': {reason}")]
    Spawn { key: String, reason: String },

    #[error("entity {provided} cannot act during {expected}'s turn")]
    NotYourTurn {
        expected: EntityId,
        provided: EntityId,
    },

    #[error("position ({}, {}) is not walkable", .0.x, .0.y)]
    InvalidPosition(Position),

    #[error("malformed action: {0}")]
    MalformedAction(#[from] serde_json::Error),

    #[error(transparent)]
    Use(#[from] UseError),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Use(e) => e.severity(),
            Self::Turn(e) => e.severity(),
            Self::MalformedAction(_) | Self::InvalidPosition(_) => ErrorSeverity::Validation,
            Self::Spawn { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EncounterActive => "RUNTIME_ENCOUNTER_ACTIVE",
            Self::NoEncounter => "RUNTIME_NO_ENCOUNTER",
            Self::NoLivingParty => "RUNTIME_NO_LIVING_PARTY",
            Self::NoEnemies => "RUNTIME_NO_ENEMIES",
            Self::EntityNotFound(_) => "RUNTIME_ENTITY_NOT_FOUND",
            Self::DuplicateEntity(_) => "RUNTIME_DUPLICATE_ENTITY",
            Self::Spawn { .. } => "RUNTIME_SPAWN_FAILED",
            Self::NotYourTurn { .. } => "RUNTIME_NOT_YOUR_TURN",
            Self::InvalidPosition(_) => "RUNTIME_INVALID_POSITION",
            Self::MalformedAction(_) => "RUNTIME_MALFORMED_ACTION",
            Self::Use(e) => e.error_code(),
            Self::Turn(e) => e.error_code(),
        }
    }
}
