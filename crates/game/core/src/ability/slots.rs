//! Slot assignment rules on top of [`AbilitySlots`](crate::state::AbilitySlots).

use super::catalog::AbilityCatalog;
use super::definition::{AbilityDefinition, AbilityType};
use super::error::SlotError;
use crate::state::{AbilityKey, EnemyRole, Entity, SlotKind};

/// Active slots filled per enemy tier (1 through 5).
const TIER_ACTIVE_SLOTS: [usize; 5] = [3, 4, 6, 7, 9];
/// Passive slots filled per enemy tier (1 through 5).
const TIER_PASSIVE_SLOTS: [usize; 5] = [1, 2, 3, 4, 5];

fn tier_index(tier: u8) -> usize {
    usize::from(tier.clamp(1, 5)) - 1
}

/// Category order a role fills its slots in. Unlisted categories go last.
fn role_priority(role: EnemyRole) -> &'static [&'static str] {
    match role {
        EnemyRole::Tank => &["defensive", "combat", "utility"],
        EnemyRole::Bruiser => &["combat", "defensive", "utility"],
        EnemyRole::Skirmisher => &["mobility", "combat", "utility", "defensive"],
        EnemyRole::Support => &["utility", "defensive", "combat"],
    }
}

/// Enforces capacity, the swap lock and the at-most-one-slot invariant.
#[derive(Clone, Copy, Debug)]
pub struct AbilitySlotManager<'a> {
    catalog: &'a AbilityCatalog,
}

impl<'a> AbilitySlotManager<'a> {
    pub fn new(catalog: &'a AbilityCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a AbilityCatalog {
        self.catalog
    }

    /// Slots may change only outside combat and once the swap lock expires.
    pub fn can_swap(&self, entity: &Entity) -> bool {
        !entity.in_combat && entity.slots.swap_cooldown == 0
    }

    /// Places `ability` in `kind[index]`, moving it out of any slot it
    /// previously held. Returns the ability that was displaced.
    pub fn slot(
        &self,
        entity: &mut Entity,
        ability: &str,
        kind: SlotKind,
        index: usize,
    ) -> Result<Option<AbilityKey>, SlotError> {
        check_index(kind, index)?;
        if !self.can_swap(entity) {
            return Err(SlotError::SwapLocked);
        }
        let definition = self
            .catalog
            .get(ability)
            .ok_or_else(|| SlotError::UnknownAbility(ability.to_owned()))?;
        if slot_kind_for(definition) != kind {
            return Err(SlotError::WrongSlotKind {
                ability: ability.to_owned(),
                kind,
            });
        }

        if entity.slots.get(kind, index).map(String::as_str) == Some(ability) {
            return Ok(None);
        }
        if let Some((old_kind, old_index)) = entity.slots.position_of(ability) {
            entity.slots.replace(old_kind, old_index, None);
        }
        let displaced = entity
            .slots
            .replace(kind, index, Some(definition.key.clone()));
        entity.slots.assert_unique();
        Ok(displaced)
    }

    /// Empties `kind[index]`, returning its previous occupant.
    pub fn unslot(
        &self,
        entity: &mut Entity,
        kind: SlotKind,
        index: usize,
    ) -> Result<Option<AbilityKey>, SlotError> {
        check_index(kind, index)?;
        if !self.can_swap(entity) {
            return Err(SlotError::SwapLocked);
        }
        Ok(entity.slots.replace(kind, index, None))
    }

    /// The only gate on whether an ability may be invoked.
    pub fn is_slotted(&self, entity: &Entity, ability: &str) -> bool {
        entity.slots.contains(ability)
    }

    /// Locks slot changes for `turns` turns.
    pub fn begin_swap_cooldown(&self, entity: &mut Entity, turns: u32) {
        entity.slots.swap_cooldown = entity.slots.swap_cooldown.max(turns);
    }

    pub fn tick_swap_cooldown(&self, entity: &mut Entity) {
        entity.slots.swap_cooldown = entity.slots.swap_cooldown.saturating_sub(1);
    }

    /// Empties both slot arrays regardless of the swap lock (death, despawn).
    pub fn clear_all(&self, entity: &mut Entity) {
        entity.slots.clear();
    }

    /// Fills an enemy's slots from `candidates`.
    ///
    /// Slot counts come from the enemy's tier (1 without a profile); within
    /// each type candidates are ordered by the role's category priority, ties
    /// keeping catalog order. Unknown candidates are skipped. Existing slots
    /// are replaced.
    pub fn auto_slot_enemy_abilities<S: AsRef<str>>(
        &self,
        enemy: &mut Entity,
        candidates: &[S],
        role: EnemyRole,
    ) -> Vec<AbilityKey> {
        let priority = role_priority(role);
        let rank = |def: &AbilityDefinition| {
            let category = priority
                .iter()
                .position(|c| *c == def.category)
                .unwrap_or(priority.len());
            let order = self.catalog.order_of(&def.key).unwrap_or(usize::MAX);
            (category, order)
        };

        let mut definitions: Vec<&AbilityDefinition> = Vec::new();
        for key in candidates {
            if let Some(def) = self.catalog.get(key.as_ref())
                && !definitions.iter().any(|d| d.key == def.key)
            {
                definitions.push(def);
            }
        }
        definitions.sort_by_key(|def| rank(def));

        enemy.slots.clear();
        let tier = tier_index(enemy.enemy_profile.map_or(1, |p| p.tier));
        let mut slotted = Vec::new();
        for (kind, count) in [
            (SlotKind::Active, TIER_ACTIVE_SLOTS[tier]),
            (SlotKind::Passive, TIER_PASSIVE_SLOTS[tier]),
        ] {
            let chosen = definitions
                .iter()
                .filter(|def| slot_kind_for(def) == kind)
                .take(count.min(kind.capacity()));
            for (index, def) in chosen.enumerate() {
                enemy.slots.replace(kind, index, Some(def.key.clone()));
                slotted.push(def.key.clone());
            }
        }
        enemy.slots.assert_unique();
        slotted
    }
}

fn check_index(kind: SlotKind, index: usize) -> Result<(), SlotError> {
    if index >= kind.capacity() {
        return Err(SlotError::IndexOutOfRange {
            kind,
            index,
            capacity: kind.capacity(),
        });
    }
    Ok(())
}

fn slot_kind_for(definition: &AbilityDefinition) -> SlotKind {
    match definition.ability_type {
        AbilityType::Active => SlotKind::Active,
        AbilityType::Passive => SlotKind::Passive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::AbilityDraft;
    use crate::state::{EnemyProfile, EntityId};

    fn catalog() -> AbilityCatalog {
        let mut catalog = AbilityCatalog::new();
        let entries = [
            ("strike", AbilityType::Active, "combat"),
            ("guard", AbilityType::Active, "defensive"),
            ("dash", AbilityType::Active, "mobility"),
            ("mend", AbilityType::Active, "utility"),
            ("cleave", AbilityType::Active, "combat"),
            ("thick_hide", AbilityType::Passive, "defensive"),
            ("rage", AbilityType::Passive, "combat"),
        ];
        for (key, kind, category) in entries {
            catalog
                .register(key, AbilityDraft::new(key, kind, category, 80.0))
                .unwrap();
        }
        catalog
    }

    #[test]
    fn reslotting_moves_the_ability() {
        let catalog = catalog();
        let manager = AbilitySlotManager::new(&catalog);
        let mut hero = Entity::player(EntityId(1), "hero");

        assert_eq!(manager.slot(&mut hero, "strike", SlotKind::Active, 3), Ok(None));
        assert_eq!(manager.slot(&mut hero, "strike", SlotKind::Active, 5), Ok(None));
        assert_eq!(hero.slots.get(SlotKind::Active, 3), None);
        assert_eq!(
            hero.slots.get(SlotKind::Active, 5).map(String::as_str),
            Some("strike")
        );
        assert_eq!(hero.slots.occupied(SlotKind::Active), 1);
    }

    #[test]
    fn slot_returns_displaced_ability() {
        let catalog = catalog();
        let manager = AbilitySlotManager::new(&catalog);
        let mut hero = Entity::player(EntityId(1), "hero");

        manager.slot(&mut hero, "strike", SlotKind::Active, 0).unwrap();
        let displaced = manager.slot(&mut hero, "guard", SlotKind::Active, 0).unwrap();
        assert_eq!(displaced.as_deref(), Some("strike"));
        assert!(!manager.is_slotted(&hero, "strike"));
    }

    #[test]
    fn rejects_bad_index_kind_and_lock() {
        let catalog = catalog();
        let manager = AbilitySlotManager::new(&catalog);
        let mut hero = Entity::player(EntityId(1), "hero");

        assert!(matches!(
            manager.slot(&mut hero, "strike", SlotKind::Active, 9),
            Err(SlotError::IndexOutOfRange { capacity: 9, .. })
        ));
        assert!(matches!(
            manager.slot(&mut hero, "rage", SlotKind::Active, 0),
            Err(SlotError::WrongSlotKind { .. })
        ));
        assert_eq!(
            manager.slot(&mut hero, "nope", SlotKind::Active, 0),
            Err(SlotError::UnknownAbility("nope".into()))
        );

        hero.in_combat = true;
        assert_eq!(
            manager.slot(&mut hero, "strike", SlotKind::Active, 0),
            Err(SlotError::SwapLocked)
        );

        hero.in_combat = false;
        manager.begin_swap_cooldown(&mut hero, 2);
        assert!(!manager.can_swap(&hero));
        manager.tick_swap_cooldown(&mut hero);
        manager.tick_swap_cooldown(&mut hero);
        assert!(manager.can_swap(&hero));
    }

    #[test]
    fn unslot_respects_the_lock() {
        let catalog = catalog();
        let manager = AbilitySlotManager::new(&catalog);
        let mut hero = Entity::player(EntityId(1), "hero");
        manager.slot(&mut hero, "thick_hide", SlotKind::Passive, 4).unwrap();

        hero.in_combat = true;
        assert_eq!(
            manager.unslot(&mut hero, SlotKind::Passive, 4),
            Err(SlotError::SwapLocked)
        );
        hero.in_combat = false;
        assert_eq!(
            manager.unslot(&mut hero, SlotKind::Passive, 4).unwrap().as_deref(),
            Some("thick_hide")
        );
        assert!(!manager.is_slotted(&hero, "thick_hide"));
    }

    #[test]
    fn auto_slot_follows_tier_and_role() {
        let catalog = catalog();
        let manager = AbilitySlotManager::new(&catalog);
        let profile = |tier| EnemyProfile {
            tier,
            role: EnemyRole::Tank,
        };
        let mut orc = Entity::enemy(EntityId(2), "orc", profile(1));
        let candidates = ["strike", "guard", "dash", "mend", "cleave", "thick_hide", "rage"];

        let slotted = manager.auto_slot_enemy_abilities(&mut orc, &candidates, EnemyRole::Tank);
        assert_eq!(slotted, ["guard", "strike", "cleave", "thick_hide"]);
        assert_eq!(orc.slots.occupied(SlotKind::Active), 3);
        assert_eq!(orc.slots.occupied(SlotKind::Passive), 1);

        orc.enemy_profile = Some(profile(2));
        let slotted =
            manager.auto_slot_enemy_abilities(&mut orc, &candidates, EnemyRole::Skirmisher);
        assert_eq!(slotted, ["dash", "strike", "cleave", "mend", "rage", "thick_hide"]);
    }

    #[test]
    fn clear_all_ignores_the_lock() {
        let catalog = catalog();
        let manager = AbilitySlotManager::new(&catalog);
        let mut hero = Entity::player(EntityId(1), "hero");
        manager.slot(&mut hero, "strike", SlotKind::Active, 0).unwrap();
        hero.in_combat = true;
        manager.clear_all(&mut hero);
        assert_eq!(hero.slots.all_slotted().count(), 0);
    }
}
