//! Use-driven skill progression.
//!
//! Skills gain exactly one xp per qualifying ability use. Levels are never
//! stored independently: after every write the level is recomputed from xp
//! through the threshold table in [`table`].
mod table;

pub use table::{XP_THRESHOLDS, level_for_xp, xp_threshold};

use crate::config::CombatConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Entity, SkillKey, SkillRecord};

/// A level transition to broadcast to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUp {
    pub skill: SkillKey,
    pub old_level: u32,
    pub new_level: u32,
}

/// Outcome of [`SkillProgressionTracker::award_use`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Award {
    /// The entity does not track this skill; nothing changed.
    Untracked,
    /// One xp was added.
    Gained {
        skill: SkillKey,
        xp: u64,
        level_up: Option<LevelUp>,
    },
}

impl Award {
    pub fn level_up(&self) -> Option<&LevelUp> {
        match self {
            Award::Gained { level_up, .. } => level_up.as_ref(),
            Award::Untracked => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error("skill `{0}` is not tracked by this entity")]
    UnknownSkill(SkillKey),
}

impl GameError for ProgressionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "PROGRESSION_UNKNOWN_SKILL"
    }
}

/// Owns the set of skills every entity tracks and the xp curve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillProgressionTracker {
    known_skills: Vec<SkillKey>,
}

impl SkillProgressionTracker {
    pub fn new<I, K>(known_skills: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SkillKey>,
    {
        let mut known_skills: Vec<SkillKey> = known_skills.into_iter().map(Into::into).collect();
        known_skills.sort();
        known_skills.dedup();
        Self { known_skills }
    }

    pub fn known_skills(&self) -> &[SkillKey] {
        &self.known_skills
    }

    /// Resets every known skill on `entity` to level 0 with no xp.
    pub fn initialize(&self, entity: &mut Entity) {
        for skill in &self.known_skills {
            entity.skills.insert(skill.clone(), SkillRecord::default());
        }
    }

    /// Adds exactly one xp to `skill` and recomputes its level.
    ///
    /// Silently does nothing for skills the entity doesn't track.
    pub fn award_use(&self, entity: &mut Entity, skill: &str) -> Award {
        let Some(record) = entity.skills.get_mut(skill) else {
            return Award::Untracked;
        };

        let old_level = record.level;
        record.xp += 1;
        record.use_count += 1;
        record.level = level_for_xp(record.xp);
        assert!(
            record.level >= old_level,
            "skill `{skill}` regressed from level {old_level} to {}",
            record.level
        );

        let level_up = (record.level > old_level).then(|| LevelUp {
            skill: skill.to_owned(),
            old_level,
            new_level: record.level,
        });

        Award::Gained {
            skill: skill.to_owned(),
            xp: record.xp,
            level_up,
        }
    }

    /// Raises `skill` by `levels` (capped at 100) and sets xp to that level's
    /// threshold. Used for character-creation point allocation, never in combat.
    pub fn bulk_advance(
        &self,
        entity: &mut Entity,
        skill: &str,
        levels: u32,
    ) -> Result<Option<LevelUp>, ProgressionError> {
        let record = entity
            .skills
            .get_mut(skill)
            .ok_or_else(|| ProgressionError::UnknownSkill(skill.to_owned()))?;

        let old_level = record.level;
        let new_level = old_level
            .saturating_add(levels)
            .min(CombatConfig::MAX_SKILL_LEVEL);
        // xp never moves backwards, even if it already sits past the threshold.
        record.xp = record.xp.max(xp_threshold(new_level));
        record.level = level_for_xp(record.xp);

        Ok((record.level > old_level).then(|| LevelUp {
            skill: skill.to_owned(),
            old_level,
            new_level: record.level,
        }))
    }
}
