//! Auto-play policy for party members.

use tactics_content::Content;
use tactics_core::{
    AbilityDefinition, EffectKind, Entity, EntityId, Roster, Side, SlotKind, UseRequest,
};
use tactics_runtime::CombatAction;

/// Picks the next request for `actor`: the hardest-hitting usable attack on
/// the nearest enemy, else a step toward it, else ending the turn.
pub fn choose(content: &Content, roster: &Roster, actor: EntityId) -> CombatAction {
    let Some(entity) = roster.get(actor) else {
        return CombatAction::end_turn(actor);
    };
    let Some(foe) = nearest_foe(roster, entity) else {
        return CombatAction::end_turn(actor);
    };
    let engine = content.engine();
    let usable = |request: &UseRequest| engine.check(roster, request).is_ok();

    let attack = entity
        .slots
        .slotted(SlotKind::Active)
        .filter_map(|key| content.catalog.get(key))
        .filter(|definition| damage_of(definition) > 0.0)
        .filter(|definition| usable(&UseRequest::new(actor, definition.key.clone()).on(foe.id)))
        .max_by(|a, b| damage_of(a).total_cmp(&damage_of(b)));
    if let Some(definition) = attack {
        return CombatAction::use_skill_on(actor, definition.key.clone(), foe.id);
    }

    let destination = entity.position.step_toward(foe.position);
    if destination != foe.position && !roster.is_occupied(destination, Some(actor)) {
        let step = entity
            .slots
            .slotted(SlotKind::Active)
            .filter_map(|key| content.catalog.get(key))
            .filter(|definition| definition.effect(EffectKind::Movement).is_some())
            .find(|definition| {
                usable(&UseRequest::new(actor, definition.key.clone()).at(destination))
            });
        if let Some(definition) = step {
            return CombatAction::UseSkill {
                entity_id: actor,
                ability: definition.key.clone(),
                target: None,
                target_position: Some(destination),
            };
        }
    }

    CombatAction::end_turn(actor)
}

fn nearest_foe<'r>(roster: &'r Roster, entity: &Entity) -> Option<&'r Entity> {
    roster
        .living(Side::Enemy)
        .min_by_key(|foe| entity.position.manhattan_distance(foe.position))
}

fn damage_of(definition: &AbilityDefinition) -> f64 {
    definition.effect(EffectKind::Damage).map_or(0.0, |spec| spec.base)
}
