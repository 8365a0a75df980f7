//! Requests accepted by [`super::CombatOrchestrator::handle_action`] and
//! their replies.

use serde::{Deserialize, Serialize};
use tactics_core::{AbilityKey, AbilityOutcome, EntityId, Position, TurnProgress};

use super::CombatSnapshot;

/// `{ "type": ..., "data": { ... } }` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CombatAction {
    UseSkill {
        entity_id: EntityId,
        ability: AbilityKey,
        #[serde(default)]
        target: Option<EntityId>,
        #[serde(default)]
        target_position: Option<Position>,
    },
    EndTurn {
        entity_id: EntityId,
    },
    GetCombatState,
}

impl CombatAction {
    pub fn use_skill(entity_id: EntityId, ability: impl Into<AbilityKey>) -> Self {
        Self::UseSkill {
            entity_id,
            ability: ability.into(),
            target: None,
            target_position: None,
        }
    }

    pub fn use_skill_on(entity_id: EntityId, ability: impl Into<AbilityKey>, target: EntityId) -> Self {
        Self::UseSkill {
            entity_id,
            ability: ability.into(),
            target: Some(target),
            target_position: None,
        }
    }

    pub fn end_turn(entity_id: EntityId) -> Self {
        Self::EndTurn { entity_id }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::UseSkill { .. } => "useSkill",
            Self::EndTurn { .. } => "endTurn",
            Self::GetCombatState => "getCombatState",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActionResponse {
    SkillUsed {
        outcome: AbilityOutcome,
        /// Set when the use ended the encounter.
        progress: Option<TurnProgress>,
    },
    TurnEnded {
        progress: TurnProgress,
    },
    CombatState {
        snapshot: CombatSnapshot,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_format() {
        let action: CombatAction = serde_json::from_str(
            r#"{"type":"useSkill","data":{"entityId":1,"ability":"kick","target":2}}"#,
        )
        .unwrap();
        assert_eq!(action, CombatAction::use_skill_on(EntityId(1), "kick", EntityId(2)));

        let action: CombatAction = serde_json::from_str(r#"{"type":"getCombatState"}"#).unwrap();
        assert_eq!(action, CombatAction::GetCombatState);
    }
}
