//! Combat configuration loader.

use std::path::Path;

use tactics_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if config.current_floor == 0 {
            anyhow::bail!("current_floor must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = ConfigLoader::parse("current_floor = 4").unwrap();
        assert_eq!(config.current_floor, 4);
        assert_eq!(config.max_ai_steps, CombatConfig::DEFAULT_MAX_AI_STEPS);
        assert_eq!(config.floor_initiative_bonus(), CombatConfig::new().with_floor(4).floor_initiative_bonus());
    }

    #[test]
    fn floor_zero_is_rejected() {
        assert!(ConfigLoader::parse("current_floor = 0").is_err());
    }
}
