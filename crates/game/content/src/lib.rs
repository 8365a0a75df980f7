//! Data-driven content definitions and loaders.
//!
//! This crate houses the sample rule content and provides loaders for
//! RON/TOML data files:
//! - Ability catalog (RON)
//! - Status-effect table (RON)
//! - Known skills (RON)
//! - Party and bestiary combatant templates (RON)
//! - Combat configuration (TOML)
//!
//! Loading is fail-fast: the first malformed record aborts with a message
//! naming it. The same tables ship embedded in the crate, see [`bundled`].

#[cfg(feature = "loaders")]
pub mod bundled;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, CombatantLoader, CombatantTemplate, ConfigLoader, Content, ContentFactory,
    SkillLoader, StatusLoader,
};
