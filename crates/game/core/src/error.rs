//! Common error infrastructure for tactics-core.
//!
//! Domain-specific errors (`RegistrationError`, `SlotError`, `UseError`,
//! `TurnError`) live next to the components that raise them. This module only
//! holds the classification shared by all of them.
//!
//! # Taxonomy
//!
//! - **Validation**: malformed content (e.g. an ability missing its name).
//!   Raised at registration time and must abort startup.
//! - **Recoverable**: an action the caller may retry later or differently
//!   (not enough AP, target out of range, ability on cooldown).
//! - **Internal** / **Fatal**: invariant violations. The public API is shaped
//!   so these cannot happen; when detected they panic instead of being
//!   silently repaired.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: insufficient AP, target out of range, on cooldown
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown ability, malformed registration
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - content or state is unusable, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all tactics-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl; the Display
///   text doubles as the reason string shown to players
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics, logging and tests. Default implementation uses
    /// the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
