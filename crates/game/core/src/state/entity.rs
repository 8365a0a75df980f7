//! Combatant record shared by players and enemies.
//!
//! Entities are created by external character/enemy generators and handed to
//! the combat layer. Skill records and unlocked abilities persist across
//! encounters; cooldowns, statuses, modifiers and the swap lock are transient
//! and are cleared when an encounter ends.

use std::collections::{BTreeMap, BTreeSet};

use super::{
    AbilityKey, AbilitySlots, EntityId, ModifiedStat, Position, ResourceMeter, Side, SkillSet,
    StatusEffects, TimedModifiers,
};

/// Inclusive damage range, used by weapons and by enemies' basic attacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    /// Bare-handed damage, used when nothing is equipped.
    pub const UNARMED: Self = Self { min: 1, max: 2 };

    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn average(&self) -> f64 {
        (f64::from(self.min) + f64::from(self.max)) / 2.0
    }
}

impl Default for DamageRange {
    fn default() -> Self {
        Self::UNARMED
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weapon {
    pub name: String,
    pub damage: DamageRange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shield {
    pub name: String,
    pub defense: u32,
}

/// Equipment numbers the scaling modes read from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Option<Weapon>,
    pub shield: Option<Shield>,
}

impl Equipment {
    pub fn weapon_damage(&self) -> DamageRange {
        self.weapon.as_ref().map_or(DamageRange::UNARMED, |w| w.damage)
    }

    pub fn shield_defense(&self) -> u32 {
        self.shield.as_ref().map_or(0, |s| s.defense)
    }
}

/// Static combat numbers of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    /// Flat armor subtracted from incoming damage.
    pub defense: u32,
    /// Percentage of post-armor damage ignored (0-100).
    pub damage_reduction: u32,
    pub initiative_bonus: i32,
    /// Damage of the AI's basic attack.
    pub attack: DamageRange,
}

/// Role an enemy plays, which drives auto-slotting priorities.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EnemyRole {
    Tank,
    Bruiser,
    Skirmisher,
    Support,
}

/// Content-driven description of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyProfile {
    /// Coarse strength category, 1 through 5.
    pub tier: u8,
    pub role: EnemyRole,
}

/// A combatant: player character or enemy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub side: Side,
    pub health: ResourceMeter,
    pub action_points: ResourceMeter,
    pub position: Position,
    pub skills: SkillSet,
    /// Remaining cooldown turns per ability; absent means ready.
    pub ability_cooldowns: BTreeMap<AbilityKey, u32>,
    pub statuses: StatusEffects,
    pub modifiers: TimedModifiers,
    pub slots: AbilitySlots,
    /// Abilities the entity has unlocked so far; maintained by the caller and
    /// consulted for prerequisites.
    pub unlocked_abilities: BTreeSet<AbilityKey>,
    pub equipment: Equipment,
    pub stats: CombatStats,
    pub enemy_profile: Option<EnemyProfile>,
    pub alive: bool,
    pub in_combat: bool,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, side: Side) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            health: ResourceMeter::full(10),
            action_points: ResourceMeter::full(3),
            position: Position::ORIGIN,
            skills: SkillSet::new(),
            ability_cooldowns: BTreeMap::new(),
            statuses: StatusEffects::new(),
            modifiers: TimedModifiers::default(),
            slots: AbilitySlots::new(),
            unlocked_abilities: BTreeSet::new(),
            equipment: Equipment::default(),
            stats: CombatStats::default(),
            enemy_profile: None,
            alive: true,
            in_combat: false,
        }
    }

    pub fn player(id: EntityId, name: impl Into<String>) -> Self {
        Self::new(id, name, Side::Player)
    }

    pub fn enemy(id: EntityId, name: impl Into<String>, profile: EnemyProfile) -> Self {
        let mut entity = Self::new(id, name, Side::Enemy);
        entity.enemy_profile = Some(profile);
        entity
    }

    pub fn with_health(mut self, maximum: u32) -> Self {
        self.health = ResourceMeter::full(maximum);
        self
    }

    pub fn with_action_points(mut self, maximum: u32) -> Self {
        self.action_points = ResourceMeter::full(maximum);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_skills(mut self, skills: SkillSet) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn is_player(&self) -> bool {
        self.side == Side::Player
    }

    pub fn is_enemy(&self) -> bool {
        self.side == Side::Enemy
    }

    /// Armor including shield and active defense modifiers.
    pub fn effective_defense(&self) -> u32 {
        self.stats.defense
            + self.equipment.shield_defense()
            + self.modifiers.total(ModifiedStat::Defense)
    }

    /// Remaining cooldown of `ability` (0 when ready).
    pub fn cooldown(&self, ability: &str) -> u32 {
        self.ability_cooldowns.get(ability).copied().unwrap_or(0)
    }

    /// Health at or below `percent` of maximum.
    pub fn health_at_or_below(&self, percent: u32) -> bool {
        u64::from(self.health.current) * 100 <= u64::from(self.health.maximum) * u64::from(percent)
    }

    /// Clears state scoped to a single encounter.
    pub fn leave_combat(&mut self) {
        self.ability_cooldowns.clear();
        self.statuses.clear();
        self.modifiers.clear();
        self.in_combat = false;
    }
}
