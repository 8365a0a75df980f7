//! Encounter turn scheduling.
//!
//! ## State machine
//!
//! ```text
//! Exploration --start_encounter--> Combat --end condition / end_encounter--> Exploration
//! ```
//!
//! There is no nested combat. While in combat exactly one entry of the turn
//! order owns the turn. Enemy turns run synchronously through the AI; the
//! scheduler only hands control back when a player must act or the
//! encounter is over.
pub mod ai;
mod initiative;

pub use initiative::{build_order, roll_initiative};

use crate::ability::AbilitySlotManager;
use crate::error::{ErrorSeverity, GameError};
use crate::event::{CombatEvent, CombatOutcome};
use crate::resolve::{
    AP_PENALTY_PROPERTY, AbilityResolutionEngine, ResolveContext, check_death, whole,
};
use crate::state::{CombatPhase, EntityId, Roster, Side, TurnState};
use crate::status::{DAMAGE_PROPERTY, TickTiming};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("an encounter is already running")]
    AlreadyInCombat,

    #[error("no encounter is running")]
    NotInCombat,

    #[error("no living {0} participants")]
    NoParticipants(Side),

    #[error("it is not {0}'s turn")]
    NotYourTurn(EntityId),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotYourTurn(_) => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyInCombat => "TURN_ALREADY_IN_COMBAT",
            Self::NotInCombat => "TURN_NOT_IN_COMBAT",
            Self::NoParticipants(_) => "TURN_NO_PARTICIPANTS",
            Self::NotYourTurn(_) => "TURN_NOT_YOUR_TURN",
        }
    }
}

/// Where the scheduler stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnProgress {
    /// A player owns the turn and must act.
    AwaitingPlayer(EntityId),
    Ended(EncounterSummary),
}

/// Survivor counts reported when an encounter ends.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSummary {
    pub outcome: CombatOutcome,
    pub players_alive: usize,
    pub enemies_alive: usize,
    pub rounds: u32,
}

/// What happened when a turn began.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnStart {
    /// An incapacitating status is active; the turn is skipped.
    pub incapacitated: bool,
    /// Start-of-turn damage killed the entity.
    pub died: bool,
}

/// Drives initiative, turn ownership and enemy AI.
#[derive(Clone, Copy, Debug)]
pub struct TurnScheduler<'a> {
    engine: AbilityResolutionEngine<'a>,
}

impl<'a> TurnScheduler<'a> {
    pub fn new(engine: AbilityResolutionEngine<'a>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &AbilityResolutionEngine<'a> {
        &self.engine
    }

    /// Rolls initiative for every living participant (players first, then
    /// enemies, each in roster order), enters combat, resolves slotted
    /// passives and runs turns until a player must act.
    pub fn start_encounter(
        &self,
        roster: &mut Roster,
        turn: &mut TurnState,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<TurnProgress, TurnError> {
        if turn.is_combat() {
            return Err(TurnError::AlreadyInCombat);
        }
        for side in [Side::Player, Side::Enemy] {
            if roster.living_count(side) == 0 {
                return Err(TurnError::NoParticipants(side));
            }
        }

        let config = self.engine.config();
        let participants = roster
            .living(Side::Player)
            .chain(roster.living(Side::Enemy));
        let order = build_order(participants, config, ctx.dice);

        *turn = TurnState {
            order,
            current_index: 0,
            round: 1,
            phase: CombatPhase::Combat,
        };
        for entry in &turn.order {
            if let Some(entity) = roster.get_mut(entry.entity) {
                entity.in_combat = true;
            }
        }
        ctx.events.emit(CombatEvent::CombatStarted {
            order: turn
                .order
                .iter()
                .map(|entry| (entry.entity, entry.initiative))
                .collect(),
        });

        let ids: Vec<EntityId> = turn.order.iter().map(|entry| entry.entity).collect();
        for id in ids {
            self.engine.resolve_passives(roster, id, ctx);
        }

        Ok(self.run_until_player(roster, turn, ctx, true))
    }

    /// Begins the current entry's turn: AP restored (minus slowing
    /// penalties), start-of-turn status damage applied.
    pub fn start_turn(
        &self,
        roster: &mut Roster,
        turn: &TurnState,
        ctx: &mut ResolveContext<'_>,
    ) -> TurnStart {
        let Some(id) = turn.current_entity() else {
            return TurnStart::default();
        };
        let ledger = self.engine.ledger();

        // Magnitudes scale with whoever applied each status.
        let mut ticks = Vec::new();
        let mut penalty = 0.0;
        if let Some(entity) = roster.get(id) {
            for (key, status) in entity.statuses.iter() {
                let Some(definition) = ledger.get(key) else {
                    continue;
                };
                let source = status
                    .source
                    .and_then(|s| roster.get(s))
                    .unwrap_or(entity);
                let enhancers = definition
                    .interactions
                    .enhanced_by
                    .iter()
                    .filter(|other| entity.statuses.has(other))
                    .count() as u32;
                let stacks = f64::from(status.stacks + enhancers);
                if definition.tick_timing == TickTiming::StartOfTurn
                    && let Some(per_stack) = ledger.calculate_strength(key, DAMAGE_PROPERTY, source)
                {
                    ticks.push((key.clone(), whole(per_stack * stacks)));
                }
                if let Some(per_stack) = ledger.calculate_strength(key, AP_PENALTY_PROPERTY, source)
                {
                    penalty += per_stack * f64::from(status.stacks);
                }
            }
        }

        let Some(entity) = roster.get_mut(id) else {
            return TurnStart::default();
        };
        entity.action_points.refill();
        entity.action_points.drain(whole(penalty));

        let mut report = TurnStart::default();
        for (status, damage) in ticks {
            let dealt = entity.health.drain(damage);
            ctx.events.emit(CombatEvent::StatusTicked {
                entity: id,
                status,
                damage: dealt,
            });
        }
        report.died = check_death(entity, None, ctx.events);
        report.incapacitated = entity
            .statuses
            .iter()
            .any(|(key, _)| ledger.is_incapacitating(key));

        ctx.events.emit(CombatEvent::TurnStarted {
            entity: id,
            round: turn.round,
            action_points: entity.action_points.current,
        });
        report
    }

    /// Ends `actor`'s turn and runs the following turns until a player must
    /// act or the encounter is over.
    pub fn end_turn(
        &self,
        roster: &mut Roster,
        turn: &mut TurnState,
        actor: EntityId,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<TurnProgress, TurnError> {
        if !turn.is_combat() {
            return Err(TurnError::NotInCombat);
        }
        if turn.current_entity() != Some(actor) {
            return Err(TurnError::NotYourTurn(actor));
        }
        self.finish_current(roster, turn, ctx);
        Ok(self.run_until_player(roster, turn, ctx, false))
    }

    /// Removes `entity` from the order. An entry before the current one
    /// shifts the index back so the acting entity keeps the turn; the index
    /// resets to 0 once it runs past the end.
    pub fn remove_from_turn_order(&self, turn: &mut TurnState, entity: EntityId) -> bool {
        let Some(position) = turn.order.iter().position(|e| e.entity == entity) else {
            return false;
        };
        turn.order.remove(position);
        if position < turn.current_index {
            turn.current_index -= 1;
        }
        if turn.current_index >= turn.order.len() {
            turn.current_index = 0;
        }
        true
    }

    /// Leaves combat: clears the order, drops encounter-scoped state, clears
    /// the slots of the dead and starts the swap lock for survivors.
    pub fn end_encounter(
        &self,
        roster: &mut Roster,
        turn: &mut TurnState,
        outcome: CombatOutcome,
        ctx: &mut ResolveContext<'_>,
    ) -> EncounterSummary {
        let slots = AbilitySlotManager::new(self.engine.catalog());
        let lock = self.engine.config().swap_cooldown_turns;
        for entity in roster.iter_mut() {
            if !entity.in_combat {
                continue;
            }
            entity.leave_combat();
            if entity.alive {
                slots.begin_swap_cooldown(entity, lock);
            } else {
                slots.clear_all(entity);
            }
        }

        let summary = EncounterSummary {
            outcome,
            players_alive: roster.living_count(Side::Player),
            enemies_alive: roster.living_count(Side::Enemy),
            rounds: turn.round,
        };
        *turn = TurnState::new();
        ctx.events.emit(CombatEvent::CombatEnded {
            outcome,
            survivors: vec![
                (Side::Player, summary.players_alive),
                (Side::Enemy, summary.enemies_alive),
            ],
        });
        summary
    }

    /// Decided outcome once one side has no living members.
    pub fn outcome(&self, roster: &Roster) -> Option<CombatOutcome> {
        if roster.living_count(Side::Player) == 0 {
            Some(CombatOutcome::Defeat)
        } else if roster.living_count(Side::Enemy) == 0 {
            Some(CombatOutcome::Victory)
        } else {
            None
        }
    }

    fn finish_current(&self, roster: &mut Roster, turn: &TurnState, ctx: &mut ResolveContext<'_>) {
        let Some(id) = turn.current_entity() else {
            return;
        };
        if let Some(entity) = roster.get_mut(id) {
            self.engine.update_effects(entity);
        }
        ctx.events.emit(CombatEvent::TurnEnded {
            entity: id,
            round: turn.round,
        });
    }

    /// Drops dead entries and moves to the next living one.
    fn advance(&self, roster: &Roster, turn: &mut TurnState) {
        let current = turn.current_entity();
        let mut index = turn.current_index;
        let mut current_removed = false;
        let mut position = 0;
        turn.order.retain(|entry| {
            let keep = roster.get(entry.entity).is_some_and(|e| e.alive);
            if !keep {
                if position < turn.current_index {
                    index -= 1;
                } else if Some(entry.entity) == current {
                    current_removed = true;
                }
            }
            position += 1;
            keep
        });
        if !current_removed {
            index += 1;
        }
        if index >= turn.order.len() {
            index = 0;
            turn.round += 1;
        }
        turn.current_index = index;
    }

    fn run_until_player(
        &self,
        roster: &mut Roster,
        turn: &mut TurnState,
        ctx: &mut ResolveContext<'_>,
        first: bool,
    ) -> TurnProgress {
        let mut first = first;
        loop {
            if !first {
                self.advance(roster, turn);
            }
            first = false;

            if let Some(outcome) = self.outcome(roster) {
                return TurnProgress::Ended(self.end_encounter(roster, turn, outcome, ctx));
            }
            let Some(entry) = turn.current().copied() else {
                return TurnProgress::Ended(self.end_encounter(
                    roster,
                    turn,
                    CombatOutcome::Defeat,
                    ctx,
                ));
            };

            let start = self.start_turn(roster, turn, ctx);
            if !start.died && !start.incapacitated {
                match entry.side {
                    Side::Player => return TurnProgress::AwaitingPlayer(entry.entity),
                    Side::Enemy => self.run_ai(roster, entry.entity, ctx),
                }
            }
            self.finish_current(roster, turn, ctx);
        }
    }

    fn run_ai(&self, roster: &mut Roster, actor: EntityId, ctx: &mut ResolveContext<'_>) {
        let mut blackboard = ai::AiContext {
            roster,
            ledger: self.engine.ledger(),
            actor,
            target: None,
            resolve: ctx,
        };
        ai::take_turn(&mut blackboard, self.engine.config().max_ai_steps);
    }
}
