//! The sample content compiled into the crate.

use crate::loaders::{
    AbilityLoader, CombatantLoader, ConfigLoader, Content, LoadResult, SkillLoader, StatusLoader,
};

pub const ABILITIES: &str = include_str!("../data/abilities.ron");
pub const STATUSES: &str = include_str!("../data/statuses.ron");
pub const SKILLS: &str = include_str!("../data/skills.ron");
pub const CONFIG: &str = include_str!("../data/config.toml");
pub const PARTY: &str = include_str!("../data/party.ron");
pub const BESTIARY: &str = include_str!("../data/bestiary.ron");

/// Parses and validates the embedded tables.
pub fn load() -> LoadResult<Content> {
    let content = Content {
        catalog: AbilityLoader::parse(ABILITIES)?,
        ledger: StatusLoader::parse(STATUSES)?,
        tracker: SkillLoader::parse(SKILLS)?,
        config: ConfigLoader::parse(CONFIG)?,
        party: CombatantLoader::parse(PARTY)?,
        bestiary: CombatantLoader::parse(BESTIARY)?,
    };
    content.validate()?;
    Ok(content)
}
