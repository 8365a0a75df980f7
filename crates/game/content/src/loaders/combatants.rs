//! Combatant template loader (party members and bestiary entries).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{
    AbilityKey, AbilitySlotManager, CombatStats, EnemyProfile, Entity, EntityId, Equipment,
    Position, SkillKey, SkillProgressionTracker, SlotKind,
};

use crate::loaders::{LoadResult, read_file};

/// Static description of a combatant, instantiated with [`CombatantTemplate::spawn`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantTemplate {
    pub key: String,
    pub name: String,
    /// Present for enemies only.
    #[serde(default)]
    pub profile: Option<EnemyProfile>,
    pub health: u32,
    pub action_points: u32,
    #[serde(default)]
    pub stats: CombatStats,
    #[serde(default)]
    pub equipment: Equipment,
    /// Starting level per skill, applied through bulk advancement.
    #[serde(default)]
    pub skills: BTreeMap<SkillKey, u32>,
    /// Unlocked abilities, in slotting order for party members.
    #[serde(default)]
    pub abilities: Vec<AbilityKey>,
}

impl CombatantTemplate {
    pub fn is_enemy(&self) -> bool {
        self.profile.is_some()
    }

    /// Builds a fresh entity: skills initialised and advanced, abilities
    /// unlocked and slotted.
    ///
    /// Party members slot their abilities in listed order; enemies are
    /// auto-slotted by role and tier.
    pub fn spawn(
        &self,
        id: EntityId,
        position: Position,
        tracker: &SkillProgressionTracker,
        slots: &AbilitySlotManager<'_>,
    ) -> LoadResult<Entity> {
        let mut entity = match self.profile {
            Some(profile) => Entity::enemy(id, self.name.clone(), profile),
            None => Entity::player(id, self.name.clone()),
        }
        .with_health(self.health)
        .with_action_points(self.action_points)
        .with_stats(self.stats)
        .with_equipment(self.equipment.clone())
        .with_position(position);

        tracker.initialize(&mut entity);
        for (skill, level) in &self.skills {
            tracker
                .bulk_advance(&mut entity, skill, *level)
                .map_err(|e| anyhow::anyhow!("Combatant '{}': {}", self.key, e))?;
        }
        entity
            .unlocked_abilities
            .extend(self.abilities.iter().cloned());

        match self.profile {
            Some(profile) => {
                slots.auto_slot_enemy_abilities(&mut entity, &self.abilities, profile.role);
            }
            None => self.slot_in_order(&mut entity, slots)?,
        }
        Ok(entity)
    }

    fn slot_in_order(&self, entity: &mut Entity, slots: &AbilitySlotManager<'_>) -> LoadResult<()> {
        let (mut actives, mut passives) = (0, 0);
        for ability in &self.abilities {
            let definition = slots.catalog().get(ability).ok_or_else(|| {
                anyhow::anyhow!("Combatant '{}' lists unknown ability '{}'", self.key, ability)
            })?;
            let (kind, cursor) = if definition.is_active() {
                (SlotKind::Active, &mut actives)
            } else {
                (SlotKind::Passive, &mut passives)
            };
            slots
                .slot(entity, ability, kind, *cursor)
                .map_err(|e| anyhow::anyhow!("Combatant '{}': {}", self.key, e))?;
            *cursor += 1;
        }
        Ok(())
    }
}

/// Loader for combatant templates from RON files.
pub struct CombatantLoader;

impl CombatantLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<CombatantTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<CombatantTemplate>> {
        let templates: Vec<CombatantTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combatant RON: {}", e))?;
        Ok(templates)
    }
}
