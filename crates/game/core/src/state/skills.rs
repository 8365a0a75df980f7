use std::collections::BTreeMap;

use super::SkillKey;

/// Progress of a single skill on one entity.
///
/// `level` is always the dense function of `xp` defined by the threshold table
/// in [`crate::progression`]; only the progression tracker writes these fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillRecord {
    pub level: u32,
    pub xp: u64,
    pub use_count: u64,
}

/// Per-entity skill table keyed by skill name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillSet {
    records: BTreeMap<SkillKey, SkillRecord>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a skill set tracking `keys`, all at level 0.
    pub fn tracking<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SkillKey>,
    {
        Self {
            records: keys
                .into_iter()
                .map(|k| (k.into(), SkillRecord::default()))
                .collect(),
        }
    }

    /// Current level of `skill`; untracked skills count as level 0.
    pub fn level(&self, skill: &str) -> u32 {
        self.records.get(skill).map_or(0, |r| r.level)
    }

    pub fn is_tracked(&self, skill: &str) -> bool {
        self.records.contains_key(skill)
    }

    pub fn get(&self, skill: &str) -> Option<&SkillRecord> {
        self.records.get(skill)
    }

    pub(crate) fn get_mut(&mut self, skill: &str) -> Option<&mut SkillRecord> {
        self.records.get_mut(skill)
    }

    pub(crate) fn insert(&mut self, skill: SkillKey, record: SkillRecord) {
        self.records.insert(skill, record);
    }

    pub fn keys(&self) -> impl Iterator<Item = &SkillKey> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SkillKey, &SkillRecord)> {
        self.records.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&SkillKey, &mut SkillRecord)> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
