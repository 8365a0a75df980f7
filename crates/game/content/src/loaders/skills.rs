//! Known-skill list loader.

use std::path::Path;

use tactics_core::{SkillKey, SkillProgressionTracker};

use crate::loaders::{LoadResult, read_file};

/// Loader for the list of skills every combatant tracks.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<SkillProgressionTracker> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SkillProgressionTracker> {
        let skills: Vec<SkillKey> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill list RON: {}", e))?;
        if skills.is_empty() {
            anyhow::bail!("skill list is empty");
        }
        Ok(SkillProgressionTracker::new(skills))
    }
}
