//! Ability slot storage for an entity.
//!
//! Slots are the single gate on which abilities can actually be invoked. The
//! storage here only knows positions; assignment rules (swap lock, moving an
//! ability out of its previous slot) live in
//! [`crate::ability::AbilitySlotManager`].

use super::AbilityKey;
use crate::config::CombatConfig;

/// Which slot array an assignment targets.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SlotKind {
    Active,
    Passive,
}

impl SlotKind {
    pub const fn capacity(self) -> usize {
        match self {
            SlotKind::Active => CombatConfig::ACTIVE_SLOTS,
            SlotKind::Passive => CombatConfig::PASSIVE_SLOTS,
        }
    }
}

/// Fixed-size active and passive slot arrays plus the swap lock timer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySlots {
    active: [Option<AbilityKey>; CombatConfig::ACTIVE_SLOTS],
    passive: [Option<AbilityKey>; CombatConfig::PASSIVE_SLOTS],
    /// Turns left before slots may be reassigned again.
    pub swap_cooldown: u32,
}

impl AbilitySlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn array(&self, kind: SlotKind) -> &[Option<AbilityKey>] {
        match kind {
            SlotKind::Active => &self.active,
            SlotKind::Passive => &self.passive,
        }
    }

    fn array_mut(&mut self, kind: SlotKind) -> &mut [Option<AbilityKey>] {
        match kind {
            SlotKind::Active => &mut self.active,
            SlotKind::Passive => &mut self.passive,
        }
    }

    /// Ability in the given slot, if any. Out-of-range indices yield `None`.
    pub fn get(&self, kind: SlotKind, index: usize) -> Option<&AbilityKey> {
        self.array(kind).get(index).and_then(Option::as_ref)
    }

    /// Where `ability` is slotted, if anywhere.
    pub fn position_of(&self, ability: &str) -> Option<(SlotKind, usize)> {
        [SlotKind::Active, SlotKind::Passive]
            .into_iter()
            .find_map(|kind| {
                self.array(kind)
                    .iter()
                    .position(|slot| slot.as_deref() == Some(ability))
                    .map(|index| (kind, index))
            })
    }

    pub fn contains(&self, ability: &str) -> bool {
        self.position_of(ability).is_some()
    }

    /// Replaces the content of one slot, returning what was there.
    ///
    /// Callers are responsible for keeping each key in at most one slot.
    pub(crate) fn replace(
        &mut self,
        kind: SlotKind,
        index: usize,
        ability: Option<AbilityKey>,
    ) -> Option<AbilityKey> {
        let slot = &mut self.array_mut(kind)[index];
        std::mem::replace(slot, ability)
    }

    /// Slotted abilities of one kind in slot order.
    pub fn slotted(&self, kind: SlotKind) -> impl Iterator<Item = &AbilityKey> {
        self.array(kind).iter().flatten()
    }

    /// Every slotted ability, actives first.
    pub fn all_slotted(&self) -> impl Iterator<Item = &AbilityKey> {
        self.active.iter().chain(self.passive.iter()).flatten()
    }

    /// Number of occupied slots of one kind.
    pub fn occupied(&self, kind: SlotKind) -> usize {
        self.slotted(kind).count()
    }

    pub fn clear(&mut self) {
        self.active.iter_mut().for_each(|slot| *slot = None);
        self.passive.iter_mut().for_each(|slot| *slot = None);
    }

    /// Panics if any ability occupies more than one slot.
    ///
    /// The slot manager never produces such a state; seeing one means the
    /// caller mutated slots behind its back.
    pub fn assert_unique(&self) {
        let keys: Vec<&AbilityKey> = self.all_slotted().collect();
        for (i, key) in keys.iter().enumerate() {
            assert!(
                !keys[i + 1..].contains(key),
                "ability `{key}` occupies more than one slot"
            );
        }
    }
}
