//! Eligibility checks, run in a fixed order and short-circuiting on the
//! first failure. Nothing here mutates state.

use super::error::UseError;
use super::result::UseRequest;
use crate::ability::{AbilityCatalog, AbilityDefinition, AbilityTags, EffectKind};
use crate::config::CombatConfig;
use crate::state::{EntityId, Position, Roster};
use crate::status::StatusEffectLedger;

/// Everything the resolution step needs once a use has been accepted.
#[derive(Clone, Debug)]
pub(super) struct Plan<'c> {
    pub definition: &'c AbilityDefinition,
    /// Other entity affected; `None` means the ability acts on its user.
    pub target: Option<EntityId>,
    pub target_position: Option<Position>,
    pub ap_cost: u32,
    pub success_rate: f64,
}

/// Who is asking for the use. Passives only resolve on the engine's own path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Origin {
    Request,
    Passive,
}

pub(super) fn check<'c>(
    catalog: &'c AbilityCatalog,
    ledger: &StatusEffectLedger,
    roster: &Roster,
    request: &UseRequest,
    origin: Origin,
) -> Result<Plan<'c>, UseError> {
    let actor = roster
        .get(request.actor)
        .ok_or(UseError::ActorNotFound(request.actor))?;
    let key = request.ability.as_str();

    if !actor.slots.contains(key) {
        return Err(UseError::NotSlotted(key.to_owned()));
    }
    let definition = catalog
        .get(key)
        .ok_or_else(|| UseError::AbilityNotFound(key.to_owned()))?;
    if origin == Origin::Request && !definition.is_active() {
        return Err(UseError::PassiveNotUsable(key.to_owned()));
    }

    if definition.is_active() && !actor.alive {
        return Err(UseError::ActorDead);
    }
    if actor
        .statuses
        .iter()
        .any(|(status, _)| ledger.is_incapacitating(status))
    {
        return Err(UseError::Incapacitated);
    }
    if !definition.meets_skill_requirements(actor) {
        return Err(UseError::SkillRequirementsNotMet);
    }
    if !definition.meets_prerequisites(actor) {
        return Err(UseError::PrerequisitesNotMet);
    }

    let ap_cost = definition.ap_cost_for(actor);
    if actor.action_points.current < ap_cost {
        return Err(UseError::InsufficientAp {
            required: ap_cost,
            available: actor.action_points.current,
        });
    }
    let remaining = actor.cooldown(key);
    if remaining > 0 {
        return Err(UseError::OnCooldown { remaining });
    }

    let range = definition.range_for(actor);
    let targets_others = definition.requires_target || range > 0;
    let target = match request.target {
        Some(id) if targets_others && id != actor.id => Some(id),
        _ => None,
    };
    if definition.requires_target && target.is_none() {
        return Err(UseError::TargetRequired);
    }

    let target_position = request.target_position;
    let moves = definition.effects.contains_key(&EffectKind::Movement);
    if moves && target_position.is_none() {
        return Err(UseError::TargetPositionRequired);
    }

    if let Some(id) = target {
        let target = roster.get(id).ok_or(UseError::TargetNotFound(id))?;
        if !target.alive {
            return Err(UseError::TargetDead(id));
        }
        let distance = actor.position.manhattan_distance(target.position);
        if distance > range {
            return Err(UseError::OutOfRange { distance, range });
        }
    }
    if let Some(destination) = target_position.filter(|_| moves) {
        let distance = actor.position.manhattan_distance(destination);
        if distance > range {
            return Err(UseError::OutOfRange { distance, range });
        }
    }

    if definition.tags.contains(AbilityTags::LOW_HEALTH_ONLY)
        && !actor.health_at_or_below(CombatConfig::LOW_HEALTH_PERCENT)
    {
        return Err(UseError::LowHealthRequired);
    }

    Ok(Plan {
        definition,
        target,
        target_position,
        ap_cost,
        success_rate: definition.success_rate_for(actor),
    })
}
