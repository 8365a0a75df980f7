//! Read-only views of the encounter for `getCombatState`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tactics_core::{
    AbilityKey, CombatPhase, Entity, EntityId, Position, ResourceMeter, Roster, Side, StatusKey,
    TurnState, state::TurnEntry,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub key: StatusKey,
    pub stacks: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub name: String,
    pub side: Side,
    pub health: ResourceMeter,
    pub action_points: ResourceMeter,
    pub position: Position,
    pub alive: bool,
    pub cooldowns: BTreeMap<AbilityKey, u32>,
    pub statuses: Vec<StatusSnapshot>,
    pub slotted: Vec<AbilityKey>,
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            side: entity.side,
            health: entity.health,
            action_points: entity.action_points,
            position: entity.position,
            alive: entity.alive,
            cooldowns: entity.ability_cooldowns.clone(),
            statuses: entity
                .statuses
                .iter()
                .map(|(key, status)| StatusSnapshot {
                    key: key.clone(),
                    stacks: status.stacks,
                    remaining: status.remaining,
                })
                .collect(),
            slotted: entity.slots.all_slotted().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub phase: CombatPhase,
    pub round: u32,
    pub current: Option<EntityId>,
    pub order: Vec<TurnEntry>,
    pub entities: Vec<EntitySnapshot>,
}

impl CombatSnapshot {
    pub fn capture(roster: &Roster, turn: &TurnState) -> Self {
        Self {
            phase: turn.phase,
            round: turn.round,
            current: turn.current_entity(),
            order: turn.order.clone(),
            entities: roster.iter().map(EntitySnapshot::from).collect(),
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.id == id)
    }
}
