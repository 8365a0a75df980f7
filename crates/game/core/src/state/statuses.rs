//! Status effects and timed stat modifiers currently active on an entity.
//!
//! # Turn-based Duration
//!
//! Durations are counted in turns and decremented once per turn boundary by
//! the resolution engine's `update_effects`. Entries are removed the moment
//! they reach zero, so a present entry always has `remaining >= 1`.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use super::{EntityId, StatusKey};
use crate::config::CombatConfig;

/// A status effect instance on an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveStatus {
    /// Turns left before the effect expires.
    pub remaining: u32,
    pub stacks: u32,
    /// Entity whose skills scale the effect's magnitude. Latest applier wins.
    pub source: Option<EntityId>,
}

/// Active status effects keyed by status key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusEffects {
    effects: BTreeMap<StatusKey, ActiveStatus>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.effects.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&ActiveStatus> {
        self.effects.get(key)
    }

    /// Current stack count (0 when absent).
    pub fn stacks(&self, key: &str) -> u32 {
        self.effects.get(key).map_or(0, |s| s.stacks)
    }

    /// Adds one stack (when `add_stack`) and extends to the later duration.
    pub fn apply(
        &mut self,
        key: &str,
        duration: u32,
        add_stack: bool,
        source: Option<EntityId>,
    ) -> ActiveStatus {
        let absent = ActiveStatus {
            remaining: 0,
            stacks: 0,
            source,
        };
        if duration == 0 {
            return self.effects.get(key).copied().unwrap_or(absent);
        }
        let entry = self.effects.entry(key.to_owned()).or_insert(absent);
        entry.remaining = entry.remaining.max(duration);
        entry.source = source.or(entry.source);
        if add_stack || entry.stacks == 0 {
            entry.stacks += 1;
        }
        *entry
    }

    /// Removes a status effect immediately.
    pub fn remove(&mut self, key: &str) -> Option<ActiveStatus> {
        self.effects.remove(key)
    }

    /// Decrements every duration by one turn, dropping expired entries.
    /// Returns the keys that expired.
    pub fn tick(&mut self) -> Vec<StatusKey> {
        let mut expired = Vec::new();
        self.effects.retain(|key, status| {
            status.remaining = status.remaining.saturating_sub(1);
            if status.remaining == 0 {
                expired.push(key.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StatusKey, &ActiveStatus)> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Which stat a timed modifier adjusts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifiedStat {
    Defense,
}

/// A flat stat bonus that lasts a fixed number of turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedModifier {
    pub stat: ModifiedStat,
    pub amount: u32,
    pub remaining: u32,
}

/// Bounded list of timed modifiers. When full, new modifiers are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedModifiers {
    modifiers: ArrayVec<TimedModifier, { CombatConfig::MAX_TIMED_MODIFIERS }>,
}

impl TimedModifiers {
    /// Adds a modifier; returns false if the list is full or the duration is zero.
    pub fn push(&mut self, modifier: TimedModifier) -> bool {
        if modifier.remaining == 0 || self.modifiers.is_full() {
            return false;
        }
        self.modifiers.push(modifier);
        true
    }

    /// Sum of active bonuses for `stat`.
    pub fn total(&self, stat: ModifiedStat) -> u32 {
        self.modifiers
            .iter()
            .filter(|m| m.stat == stat)
            .map(|m| m.amount)
            .sum()
    }

    pub fn tick(&mut self) {
        for modifier in &mut self.modifiers {
            modifier.remaining = modifier.remaining.saturating_sub(1);
        }
        self.modifiers.retain(|m| m.remaining > 0);
    }

    pub fn clear(&mut self) {
        self.modifiers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedModifier> {
        self.modifiers.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_extends_to_later_duration() {
        let mut effects = StatusEffects::new();
        effects.apply("poisoned", 3, true, Some(EntityId(7)));
        let status = effects.apply("poisoned", 2, true, None);
        assert_eq!(status.remaining, 3);
        assert_eq!(status.stacks, 2);
        assert_eq!(status.source, Some(EntityId(7)));

        let refreshed = effects.apply("poisoned", 5, false, None);
        assert_eq!(refreshed.remaining, 5);
        assert_eq!(refreshed.stacks, 2);
    }

    #[test]
    fn tick_removes_expired_entries() {
        let mut effects = StatusEffects::new();
        effects.apply("stunned", 1, false, None);
        effects.apply("slowed", 2, false, None);
        let expired = effects.tick();
        assert_eq!(expired, vec!["stunned".to_owned()]);
        assert!(effects.has("slowed"));
        assert!(!effects.has("stunned"));
    }

    #[test]
    fn modifiers_sum_and_expire() {
        let mut modifiers = TimedModifiers::default();
        modifiers.push(TimedModifier {
            stat: ModifiedStat::Defense,
            amount: 3,
            remaining: 1,
        });
        modifiers.push(TimedModifier {
            stat: ModifiedStat::Defense,
            amount: 2,
            remaining: 2,
        });
        assert_eq!(modifiers.total(ModifiedStat::Defense), 5);
        modifiers.tick();
        assert_eq!(modifiers.total(ModifiedStat::Defense), 2);
        modifiers.tick();
        assert!(modifiers.is_empty());
    }
}
