use super::{EntityId, Side};

/// Whether the party is exploring or locked in an encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum CombatPhase {
    #[default]
    Exploration,
    Combat,
}

/// One participant's place in the initiative order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnEntry {
    pub entity: EntityId,
    pub side: Side,
    pub initiative: i32,
}

/// Turn order of the running encounter.
///
/// Created at combat start and discarded at combat end. `current_index`
/// always points into `order` while `order` is non-empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub order: Vec<TurnEntry>,
    pub current_index: usize,
    /// Starts at 1 and increments each time the order wraps around.
    pub round: u32,
    pub phase: CombatPhase,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&TurnEntry> {
        self.order.get(self.current_index)
    }

    pub fn current_entity(&self) -> Option<EntityId> {
        self.current().map(|entry| entry.entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.order.iter().any(|entry| entry.entity == entity)
    }

    pub fn is_combat(&self) -> bool {
        self.phase == CombatPhase::Combat
    }
}
