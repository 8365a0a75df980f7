//! Ability resolution: the single entry point through which abilities act.
//!
//! ## Resolution order
//!
//! 1. Slotted check, then catalog lookup
//! 2. Eligibility (alive, not incapacitated, skills, prerequisites, AP,
//!    cooldown, target, range, tag gates)
//! 3. Success roll for actives below 100% base. A miss costs 30% of the AP
//!    and nothing else
//! 4. Full AP cost and cooldown
//! 5. Magnitudes, then effects applied independently per effect key
//! 6. One xp per requirement skill
//! 7. `AbilityUsed` event
//!
//! Steps 1 and 2 never mutate anything.
mod effects;
mod error;
mod magnitude;
mod result;
mod validation;

pub use effects::{
    AP_PENALTY_PROPERTY, DEFENSE_PROPERTY, apply_damage, apply_status, check_death,
    effective_defense, knockback_destination, mitigated_damage, try_relocate,
};
pub use error::UseError;
pub use magnitude::whole;
pub use result::{AbilityOutcome, UseRequest};

use std::collections::BTreeMap;

use crate::ability::{AbilityCatalog, EffectKind};
use crate::config::CombatConfig;
use crate::event::{CombatEvent, EffectDelta, EventSink};
use crate::oracle::PositionOracle;
use crate::progression::SkillProgressionTracker;
use crate::rng::Dice;
use crate::state::{Entity, EntityId, Roster, SlotKind, StatusKey};
use crate::status::StatusEffectLedger;

use validation::{Origin, Plan};

/// Collaborators a single resolution borrows: randomness, map knowledge and
/// the event output.
pub struct ResolveContext<'r> {
    pub dice: &'r mut dyn Dice,
    pub oracle: &'r dyn PositionOracle,
    pub events: &'r mut dyn EventSink,
}

impl<'r> ResolveContext<'r> {
    pub fn new(
        dice: &'r mut dyn Dice,
        oracle: &'r dyn PositionOracle,
        events: &'r mut dyn EventSink,
    ) -> Self {
        Self {
            dice,
            oracle,
            events,
        }
    }
}

/// Stateless rules engine over explicitly injected registries.
#[derive(Clone, Copy, Debug)]
pub struct AbilityResolutionEngine<'a> {
    catalog: &'a AbilityCatalog,
    ledger: &'a StatusEffectLedger,
    tracker: &'a SkillProgressionTracker,
    config: &'a CombatConfig,
}

impl<'a> AbilityResolutionEngine<'a> {
    pub fn new(
        catalog: &'a AbilityCatalog,
        ledger: &'a StatusEffectLedger,
        tracker: &'a SkillProgressionTracker,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            catalog,
            ledger,
            tracker,
            config,
        }
    }

    pub fn catalog(&self) -> &'a AbilityCatalog {
        self.catalog
    }

    pub fn ledger(&self) -> &'a StatusEffectLedger {
        self.ledger
    }

    pub fn tracker(&self) -> &'a SkillProgressionTracker {
        self.tracker
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }

    /// Runs the eligibility checks without resolving anything.
    pub fn check(&self, roster: &Roster, request: &UseRequest) -> Result<(), UseError> {
        validation::check(self.catalog, self.ledger, roster, request, Origin::Request).map(|_| ())
    }

    /// Uses an ability.
    ///
    /// `Err` means the use was rejected and nothing changed. A missed success
    /// roll is not an error: it returns `Ok` with `success == false` after
    /// spending part of the AP. Passives are rejected here; they only resolve
    /// through [`Self::resolve_passives`].
    pub fn use_ability(
        &self,
        roster: &mut Roster,
        request: &UseRequest,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<AbilityOutcome, UseError> {
        self.resolve(roster, request, Origin::Request, ctx)
    }

    fn resolve(
        &self,
        roster: &mut Roster,
        request: &UseRequest,
        origin: Origin,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<AbilityOutcome, UseError> {
        let plan = validation::check(self.catalog, self.ledger, roster, request, origin)?;
        let definition = plan.definition;
        let actor_id = request.actor;

        let roll = (!definition.always_resolves()).then(|| ctx.dice.roll_percent());
        let success = roll.is_none_or(|r| r <= plan.success_rate);

        let actor = roster
            .get_mut(actor_id)
            .ok_or(UseError::ActorNotFound(actor_id))?;

        if !success {
            let ap_spent = plan.ap_cost * CombatConfig::FAILED_ROLL_AP_PERCENT / 100;
            actor.action_points.drain(ap_spent);
            let roll = roll.unwrap_or_default();
            ctx.events.emit(CombatEvent::AbilityFailed {
                entity: actor_id,
                ability: definition.key.clone(),
                roll,
                success_rate: plan.success_rate,
                ap_spent,
            });
            return Ok(AbilityOutcome {
                ability: definition.key.clone(),
                success: false,
                roll: Some(roll),
                success_rate: plan.success_rate,
                ap_spent,
                ..AbilityOutcome::default()
            });
        }

        actor.action_points.drain(plan.ap_cost);
        if definition.cooldown > 0 {
            actor
                .ability_cooldowns
                .insert(definition.key.clone(), definition.cooldown);
        }
        let magnitudes = magnitude::compute(definition, actor);

        let mut outcome = AbilityOutcome {
            ability: definition.key.clone(),
            success: true,
            roll,
            success_rate: plan.success_rate,
            ap_spent: plan.ap_cost,
            magnitudes,
            ..AbilityOutcome::default()
        };
        self.apply_effects(roster, actor_id, &plan, ctx, &mut outcome);

        if let Some(actor) = roster.get_mut(actor_id) {
            for requirement in &definition.requirements {
                let award = self.tracker.award_use(actor, &requirement.skill);
                if let Some(level_up) = award.level_up() {
                    ctx.events.emit(CombatEvent::SkillGained {
                        entity: actor_id,
                        skill: level_up.skill.clone(),
                        old_level: level_up.old_level,
                        new_level: level_up.new_level,
                    });
                    outcome.level_ups.push(level_up.clone());
                }
            }
        }

        ctx.events.emit(CombatEvent::AbilityUsed {
            entity: actor_id,
            ability: definition.key.clone(),
            target: plan.target,
            roll,
            success_rate: plan.success_rate,
            ap_spent: plan.ap_cost,
            effects: outcome.effects.clone(),
        });
        Ok(outcome)
    }

    fn apply_effects(
        &self,
        roster: &mut Roster,
        actor_id: EntityId,
        plan: &Plan<'_>,
        ctx: &mut ResolveContext<'_>,
        outcome: &mut AbilityOutcome,
    ) {
        let magnitudes: BTreeMap<EffectKind, f64> = outcome.magnitudes.clone();
        let get = |kind: EffectKind| magnitudes.get(&kind).copied();
        let mut record = |effect, entity, amount: f64| {
            outcome.effects.push(EffectDelta {
                effect,
                entity,
                amount,
            })
        };

        // Destinations are validated by the caller.
        if get(EffectKind::Movement).is_some()
            && let Some(destination) = plan.target_position
            && let Some(actor) = roster.get_mut(actor_id)
        {
            let moved = actor.position.manhattan_distance(destination);
            actor.position = destination;
            record(EffectKind::Movement, actor_id, f64::from(moved));
        }
        let actor_position = roster.get(actor_id).map(|a| a.position).unwrap_or_default();

        if let Some(target_id) = plan.target {
            if let Some(raw) = get(EffectKind::Damage)
                && let Some(target) = roster.get_mut(target_id)
            {
                let piercing = get(EffectKind::ArmorPiercing).unwrap_or(0.0);
                let dealt = apply_damage(self.ledger, target, raw, piercing);
                record(EffectKind::Damage, target_id, f64::from(dealt));
                if check_death(target, Some(actor_id), ctx.events) {
                    outcome_death(&mut outcome.deaths, target_id);
                }
            }

            let target_position = roster
                .get(target_id)
                .filter(|t| t.alive)
                .map(|t| t.position);
            if let Some(target_position) = target_position {
                if let Some(distance) = get(EffectKind::Knockback)
                    && let Some(destination) =
                        knockback_destination(actor_position, target_position, distance)
                {
                    let moved = try_relocate(roster, target_id, destination, ctx.oracle);
                    record(EffectKind::Knockback, target_id, f64::from(moved));
                }

                if let Some(chance) = get(EffectKind::StunChance)
                    && ctx.dice.roll_percent() < chance
                {
                    let duration = get(EffectKind::StunDuration)
                        .map(whole)
                        .filter(|d| *d > 0)
                        .unwrap_or(self.config.default_stun_duration);
                    if let Some(target) = roster.get_mut(target_id)
                        && let Some(status) = apply_status(
                            self.ledger,
                            target,
                            crate::status::STUNNED,
                            duration,
                            Some(actor_id),
                            ctx.events,
                        )
                    {
                        record(EffectKind::StunChance, target_id, f64::from(status.remaining));
                    }
                }
            }
        }

        let recipient = plan.target.unwrap_or(actor_id);
        if let Some(entity) = roster.get_mut(recipient).filter(|e| e.alive) {
            for infliction in &plan.definition.inflicts {
                let lands =
                    infliction.chance >= 100.0 || ctx.dice.roll_percent() < infliction.chance;
                if lands {
                    apply_status(
                        self.ledger,
                        entity,
                        &infliction.status,
                        infliction.duration,
                        Some(actor_id),
                        ctx.events,
                    );
                }
            }

            if let Some(amount) = get(EffectKind::Healing) {
                let healed = entity.health.restore(whole(amount));
                record(EffectKind::Healing, recipient, f64::from(healed));
            }

            if let Some(amount) = get(EffectKind::DefenseBonus) {
                let duration = get(EffectKind::Duration)
                    .map(whole)
                    .filter(|d| *d > 0)
                    .unwrap_or(self.config.default_buff_duration);
                let amount = whole(amount);
                if effects::grant_defense(entity, amount, duration) {
                    record(EffectKind::DefenseBonus, recipient, f64::from(amount));
                }
            }
        }

        if let Some(amount) = get(EffectKind::ApRecover)
            && let Some(actor) = roster.get_mut(actor_id)
        {
            let recovered = actor.action_points.restore(whole(amount));
            record(EffectKind::ApRecover, actor_id, f64::from(recovered));
        }
    }

    /// Resolves every slotted passive of `entity`. Rejected passives are skipped.
    pub fn resolve_passives(
        &self,
        roster: &mut Roster,
        entity: EntityId,
        ctx: &mut ResolveContext<'_>,
    ) -> Vec<AbilityOutcome> {
        let passives: Vec<String> = roster
            .get(entity)
            .map(|e| e.slots.slotted(SlotKind::Passive).cloned().collect())
            .unwrap_or_default();
        passives
            .into_iter()
            .filter_map(|key| {
                self.resolve(roster, &UseRequest::new(entity, key), Origin::Passive, ctx)
                    .ok()
            })
            .collect()
    }

    /// Turn-boundary bookkeeping for one entity: every nonzero cooldown,
    /// status duration and modifier loses a turn (zeroes are deleted), and the
    /// slot-swap lock counts down. Returns the statuses that expired.
    pub fn update_effects(&self, entity: &mut Entity) -> Vec<StatusKey> {
        entity.ability_cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
        entity.modifiers.tick();
        entity.slots.swap_cooldown = entity.slots.swap_cooldown.saturating_sub(1);
        entity.statuses.tick()
    }
}

fn outcome_death(deaths: &mut Vec<EntityId>, id: EntityId) {
    if !deaths.contains(&id) {
        deaths.push(id);
    }
}
