//! Host-facing coordinator for a party and its encounters.
//!
//! [`CombatOrchestrator`] owns the roster, the turn state and the dice, and
//! routes external requests through the core rules. Every event the rules
//! emit is stamped and published on the [`EventBus`].

mod action;
mod snapshot;

pub use action::{ActionResponse, CombatAction};
pub use snapshot::{CombatSnapshot, EntitySnapshot, StatusSnapshot};

use tactics_content::{CombatantTemplate, Content};
use tactics_core::{
    AbilityKey, AbilityOutcome, CombatEvent, CombatOutcome, EffectKind, EncounterSummary, Entity,
    EntityId, GameError, OpenField, PcgDice, Position, PositionOracle, ResolveContext, Roster, Side,
    TurnProgress, TurnScheduler, TurnState, UseRequest,
};
use tokio::sync::broadcast;

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{EventBus, StampedEvent, Topic};

const TARGET: &str = "runtime::combat";

pub struct CombatOrchestrator {
    content: Content,
    roster: Roster,
    turn: TurnState,
    dice: PcgDice,
    oracle: Box<dyn PositionOracle + Send + Sync>,
    bus: EventBus,
    sequence: u64,
    round: u32,
    next_id: u32,
}

impl CombatOrchestrator {
    pub fn new(mut content: Content, config: RuntimeConfig) -> Self {
        if let Some(combat) = config.combat.clone() {
            content.config = combat;
        }
        let seed = config.resolve_seed();
        tracing::info!(target: TARGET, seed, "orchestrator ready");

        Self {
            content,
            roster: Roster::new(),
            turn: TurnState::new(),
            dice: PcgDice::new(seed),
            oracle: Box::new(OpenField),
            bus: EventBus::with_capacity(config.event_capacity),
            sequence: 0,
            round: 0,
            next_id: 1,
        }
    }

    /// Replaces the map geometry used for movement and knockback.
    pub fn with_oracle(mut self, oracle: impl PositionOracle + Send + Sync + 'static) -> Self {
        self.oracle = Box::new(oracle);
        self
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.roster.get(id)
    }

    pub fn in_combat(&self) -> bool {
        self.turn.is_combat()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<StampedEvent> {
        self.bus.subscribe(topic)
    }

    /// Instantiates a template with a fresh id. The entity is not added to
    /// the roster.
    pub fn spawn(&mut self, template: &CombatantTemplate, position: Position) -> Result<Entity> {
        let id = self.allocate_id();
        template
            .spawn(id, position, &self.content.tracker, &self.content.slots())
            .map_err(|e| RuntimeError::Spawn {
                key: template.key.clone(),
                reason: e.to_string(),
            })
    }

    /// Spawns a party template by key and adds it to the roster.
    pub fn recruit(&mut self, key: &str, position: Position) -> Result<EntityId> {
        let template = self
            .content
            .party_member(key)
            .cloned()
            .ok_or_else(|| RuntimeError::Spawn {
                key: key.to_owned(),
                reason: "no such party member".to_owned(),
            })?;
        let entity = self.spawn(&template, position)?;
        self.add_party_member(entity)
    }

    /// Spawns a bestiary template by key, ready for [`Self::start_combat`].
    pub fn spawn_enemy(&mut self, key: &str, position: Position) -> Result<Entity> {
        let template = self
            .content
            .bestiary_entry(key)
            .cloned()
            .ok_or_else(|| RuntimeError::Spawn {
                key: key.to_owned(),
                reason: "no such bestiary entry".to_owned(),
            })?;
        self.spawn(&template, position)
    }

    pub fn add_party_member(&mut self, entity: Entity) -> Result<EntityId> {
        if self.roster.get(entity.id).is_some() {
            return Err(RuntimeError::DuplicateEntity(entity.id));
        }
        let id = entity.id;
        self.next_id = self.next_id.max(id.0 + 1);
        tracing::debug!(target: TARGET, entity = %id, name = %entity.name, "party member joined");
        self.roster.insert(entity);
        Ok(id)
    }

    /// Adds `enemies` to the roster, rolls initiative and runs turns until a
    /// player must act.
    pub fn start_combat(&mut self, enemies: Vec<Entity>) -> Result<TurnProgress> {
        if self.turn.is_combat() {
            return Err(RuntimeError::EncounterActive);
        }
        if self.roster.living_count(Side::Player) == 0 {
            return Err(RuntimeError::NoLivingParty);
        }
        if !enemies.iter().any(|e| e.alive) {
            return Err(RuntimeError::NoEnemies);
        }
        for (index, enemy) in enemies.iter().enumerate() {
            if self.roster.get(enemy.id).is_some() || enemies[..index].iter().any(|e| e.id == enemy.id)
            {
                return Err(RuntimeError::DuplicateEntity(enemy.id));
            }
        }

        let count = enemies.len();
        for enemy in enemies {
            self.next_id = self.next_id.max(enemy.id.0 + 1);
            self.roster.insert(enemy);
        }
        tracing::info!(
            target: TARGET,
            party = self.roster.living_count(Side::Player),
            enemies = count,
            "combat starting"
        );

        let progress =
            self.run(|scheduler, roster, turn, ctx| scheduler.start_encounter(roster, turn, ctx));
        match progress {
            Ok(progress) => {
                self.after_progress(&progress);
                Ok(progress)
            }
            Err(e) => {
                self.roster.drain_side(Side::Enemy);
                Err(e.into())
            }
        }
    }

    /// Dispatches one host request.
    pub fn handle_action(&mut self, action: CombatAction) -> Result<ActionResponse> {
        let kind = action.kind();
        let result = match action {
            CombatAction::UseSkill {
                entity_id,
                ability,
                target,
                target_position,
            } => self.use_skill(entity_id, ability, target, target_position),
            CombatAction::EndTurn { entity_id } => self
                .end_turn(entity_id)
                .map(|progress| ActionResponse::TurnEnded { progress }),
            CombatAction::GetCombatState => Ok(ActionResponse::CombatState {
                snapshot: self.snapshot(),
            }),
        };
        if let Err(e) = &result {
            tracing::warn!(
                target: TARGET,
                action = kind,
                code = e.error_code(),
                error = %e,
                "action rejected"
            );
        }
        result
    }

    /// Parses a JSON request and dispatches it.
    pub fn handle_json(&mut self, request: &str) -> Result<ActionResponse> {
        let action: CombatAction = serde_json::from_str(request)?;
        self.handle_action(action)
    }

    fn use_skill(
        &mut self,
        entity: EntityId,
        ability: AbilityKey,
        target: Option<EntityId>,
        target_position: Option<Position>,
    ) -> Result<ActionResponse> {
        if self.roster.get(entity).is_none() {
            return Err(RuntimeError::EntityNotFound(entity));
        }
        self.ensure_turn(entity)?;
        if let Some(position) = target_position
            && !self.oracle.is_valid_position(position.x, position.y)
        {
            return Err(RuntimeError::InvalidPosition(position));
        }
        let moves = self
            .content
            .catalog
            .get(&ability)
            .is_some_and(|definition| definition.effect(EffectKind::Movement).is_some());
        if moves
            && let Some(position) = target_position
            && self.roster.is_occupied(position, Some(entity))
        {
            return Err(RuntimeError::InvalidPosition(position));
        }

        let request = UseRequest {
            actor: entity,
            ability,
            target,
            target_position,
        };

        let (outcome, progress) = self.run(|scheduler, roster, turn, ctx| {
            let outcome = scheduler.engine().use_ability(roster, &request, ctx)?;
            let progress = if turn.is_combat() {
                scheduler
                    .outcome(roster)
                    .map(|result| TurnProgress::Ended(scheduler.end_encounter(roster, turn, result, ctx)))
            } else {
                None
            };
            Ok::<_, RuntimeError>((outcome, progress))
        })?;

        self.log_outcome(entity, &outcome);
        if let Some(progress) = &progress {
            self.after_progress(progress);
        }
        Ok(ActionResponse::SkillUsed { outcome, progress })
    }

    /// Ends the acting player's turn; enemies act until a player is up again.
    pub fn end_turn(&mut self, entity: EntityId) -> Result<TurnProgress> {
        if !self.turn.is_combat() {
            return Err(RuntimeError::NoEncounter);
        }
        if self.roster.get(entity).is_none() {
            return Err(RuntimeError::EntityNotFound(entity));
        }
        self.ensure_turn(entity)?;

        let progress =
            self.run(|scheduler, roster, turn, ctx| scheduler.end_turn(roster, turn, entity, ctx))?;
        self.after_progress(&progress);
        Ok(progress)
    }

    /// Forces the encounter to end, e.g. on flee or a scripted victory.
    pub fn end_combat(&mut self, victory: bool) -> Result<EncounterSummary> {
        if !self.turn.is_combat() {
            return Err(RuntimeError::NoEncounter);
        }
        let outcome = if victory {
            CombatOutcome::Victory
        } else {
            CombatOutcome::Defeat
        };
        let summary =
            self.run(|scheduler, roster, turn, ctx| scheduler.end_encounter(roster, turn, outcome, ctx));
        self.finish_encounter(&summary);
        Ok(summary)
    }

    /// Advances out-of-combat timers by one exploration turn: cooldowns,
    /// statuses, timed modifiers and the slot-swap lock.
    pub fn exploration_tick(&mut self) {
        if self.turn.is_combat() {
            return;
        }
        let engine = self.content.engine();
        for entity in self.roster.iter_mut().filter(|e| e.alive) {
            let expired = engine.update_effects(entity);
            if !expired.is_empty() {
                tracing::debug!(target: TARGET, entity = %entity.id, ?expired, "statuses expired");
            }
        }
    }

    pub fn snapshot(&self) -> CombatSnapshot {
        CombatSnapshot::capture(&self.roster, &self.turn)
    }

    fn ensure_turn(&self, entity: EntityId) -> Result<()> {
        if !self.turn.is_combat() {
            return Ok(());
        }
        match self.turn.current_entity() {
            Some(expected) if expected != entity => Err(RuntimeError::NotYourTurn {
                expected,
                provided: entity,
            }),
            _ => Ok(()),
        }
    }

    /// Runs `f` against the rules with a fresh event buffer, then publishes
    /// whatever it emitted.
    fn run<R>(
        &mut self,
        f: impl FnOnce(TurnScheduler<'_>, &mut Roster, &mut TurnState, &mut ResolveContext<'_>) -> R,
    ) -> R {
        let mut events: Vec<CombatEvent> = Vec::new();
        let result = {
            let scheduler = TurnScheduler::new(self.content.engine());
            let mut ctx = ResolveContext::new(&mut self.dice, &*self.oracle, &mut events);
            f(scheduler, &mut self.roster, &mut self.turn, &mut ctx)
        };
        self.publish(events);
        result
    }

    fn publish(&mut self, events: Vec<CombatEvent>) {
        for event in events {
            let closes = matches!(event, CombatEvent::CombatEnded { .. });
            match &event {
                CombatEvent::CombatStarted { .. } => self.round = 1,
                CombatEvent::TurnStarted { round, .. } => self.round = *round,
                CombatEvent::EntityDied { entity, killer } => {
                    tracing::info!(target: TARGET, entity = %entity, killer = ?killer, "entity died");
                }
                CombatEvent::SkillGained {
                    entity,
                    skill,
                    new_level,
                    ..
                } => {
                    tracing::info!(
                        target: TARGET,
                        entity = %entity,
                        skill = %skill,
                        level = new_level,
                        "skill gained"
                    );
                }
                _ => {}
            }
            tracing::trace!(target: TARGET, event = event.name(), round = self.round);
            self.bus
                .publish(StampedEvent::new(self.round, self.sequence, event));
            self.sequence += 1;
            if closes {
                self.round = 0;
            }
        }
    }

    fn log_outcome(&self, entity: EntityId, outcome: &AbilityOutcome) {
        tracing::debug!(
            target: TARGET,
            entity = %entity,
            ability = %outcome.ability,
            success = outcome.success,
            ap_spent = outcome.ap_spent,
            "ability resolved"
        );
    }

    fn after_progress(&mut self, progress: &TurnProgress) {
        match progress {
            TurnProgress::AwaitingPlayer(id) => {
                tracing::debug!(target: TARGET, entity = %id, round = self.turn.round, "awaiting player");
            }
            TurnProgress::Ended(summary) => self.finish_encounter(summary),
        }
    }

    fn finish_encounter(&mut self, summary: &EncounterSummary) {
        let removed = self.roster.drain_side(Side::Enemy);
        tracing::info!(
            target: TARGET,
            outcome = ?summary.outcome,
            rounds = summary.rounds,
            players_alive = summary.players_alive,
            enemies_removed = removed.len(),
            "combat ended"
        );
    }

    fn allocate_id(&mut self) -> EntityId {
        while self.roster.get(EntityId(self.next_id)).is_some() {
            self.next_id += 1;
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }
}
