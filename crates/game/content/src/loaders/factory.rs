//! Content factory for building validated rule sets from data files.

use std::path::{Path, PathBuf};

use tactics_core::{
    AbilityCatalog, AbilityResolutionEngine, AbilitySlotManager, CombatConfig, EffectKind,
    SkillProgressionTracker, StatusEffectLedger, status::STUNNED,
};

use crate::loaders::{
    AbilityLoader, CombatantLoader, CombatantTemplate, ConfigLoader, LoadResult, SkillLoader,
    StatusLoader,
};

/// Everything an encounter needs, cross-checked after loading.
#[derive(Debug, Clone)]
pub struct Content {
    pub catalog: AbilityCatalog,
    pub ledger: StatusEffectLedger,
    pub tracker: SkillProgressionTracker,
    pub config: CombatConfig,
    pub party: Vec<CombatantTemplate>,
    pub bestiary: Vec<CombatantTemplate>,
}

impl Content {
    /// Checks references between tables: inflicted statuses, the stun
    /// status, and combatant ability lists.
    pub fn validate(&self) -> LoadResult<()> {
        for ability in self.catalog.iter() {
            for infliction in &ability.inflicts {
                if !self.ledger.contains(&infliction.status) {
                    anyhow::bail!(
                        "Ability '{}' inflicts unknown status '{}'",
                        ability.key,
                        infliction.status
                    );
                }
            }
            if ability.effects.contains_key(&EffectKind::StunChance)
                && !self.ledger.contains(STUNNED)
            {
                anyhow::bail!(
                    "Ability '{}' can stun but no '{}' status is defined",
                    ability.key,
                    STUNNED
                );
            }
            for requirement in &ability.requirements {
                if !self.tracker.known_skills().contains(&requirement.skill) {
                    anyhow::bail!(
                        "Ability '{}' requires unknown skill '{}'",
                        ability.key,
                        requirement.skill
                    );
                }
            }
        }

        for template in self.party.iter().chain(&self.bestiary) {
            if let Some(missing) = template
                .abilities
                .iter()
                .find(|key| !self.catalog.contains(key))
            {
                anyhow::bail!(
                    "Combatant '{}' lists unknown ability '{}'",
                    template.key,
                    missing
                );
            }
        }
        if let Some(template) = self.party.iter().find(|t| t.is_enemy()) {
            anyhow::bail!("Party member '{}' has an enemy profile", template.key);
        }
        if let Some(template) = self.bestiary.iter().find(|t| !t.is_enemy()) {
            anyhow::bail!("Bestiary entry '{}' has no enemy profile", template.key);
        }
        Ok(())
    }

    pub fn engine(&self) -> AbilityResolutionEngine<'_> {
        AbilityResolutionEngine::new(&self.catalog, &self.ledger, &self.tracker, &self.config)
    }

    pub fn slots(&self) -> AbilitySlotManager<'_> {
        AbilitySlotManager::new(&self.catalog)
    }

    pub fn bestiary_entry(&self, key: &str) -> Option<&CombatantTemplate> {
        self.bestiary.iter().find(|t| t.key == key)
    }

    pub fn party_member(&self, key: &str) -> Option<&CombatantTemplate> {
        self.party.iter().find(|t| t.key == key)
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── skills.ron
/// ├── statuses.ron
/// ├── abilities.ron
/// ├── party.ron
/// └── bestiary.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    pub fn load_skills(&self) -> LoadResult<SkillProgressionTracker> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    pub fn load_statuses(&self) -> LoadResult<StatusEffectLedger> {
        StatusLoader::load(&self.data_dir.join("statuses.ron"))
    }

    pub fn load_abilities(&self) -> LoadResult<AbilityCatalog> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    pub fn load_party(&self) -> LoadResult<Vec<CombatantTemplate>> {
        CombatantLoader::load(&self.data_dir.join("party.ron"))
    }

    pub fn load_bestiary(&self) -> LoadResult<Vec<CombatantTemplate>> {
        CombatantLoader::load(&self.data_dir.join("bestiary.ron"))
    }

    /// Loads every table and validates cross references.
    pub fn load_all(&self) -> LoadResult<Content> {
        let content = Content {
            catalog: self.load_abilities()?,
            ledger: self.load_statuses()?,
            tracker: self.load_skills()?,
            config: self.load_config()?,
            party: self.load_party()?,
            bestiary: self.load_bestiary()?,
        };
        content.validate()?;
        Ok(content)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let factory = ContentFactory::new("/definitely/not/here");
        let err = factory.load_all().unwrap_err().to_string();
        assert!(err.contains("Failed to read file"), "{err}");
    }
}
