//! Content loaders for reading game data from files.
//!
//! RON holds the ability, status and combatant tables; TOML holds the combat
//! config. Every loader has a `load(path)` entry point and a `parse(text)`
//! twin used for embedded data.

pub mod abilities;
pub mod combatants;
pub mod config;
pub mod factory;
pub mod skills;
pub mod statuses;

pub use abilities::AbilityLoader;
pub use combatants::{CombatantLoader, CombatantTemplate};
pub use config::ConfigLoader;
pub use factory::{Content, ContentFactory};
pub use skills::SkillLoader;
pub use statuses::StatusLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
