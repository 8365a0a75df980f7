//! Orchestrator flows: encounter lifecycle, request routing and the bus.

use tactics_content::Content;
use tactics_core::{
    AbilityCatalog, AbilityDraft, AbilitySlotManager, AbilityType, CombatConfig, CombatEvent,
    CombatOutcome, CombatPhase, EnemyProfile, EnemyRole, Entity, EntityId, Position, RoomBounds,
    ScalingMode, SkillProgressionTracker, SlotKind, StatusEffectDefinition, StatusEffectLedger,
    StatusKind, TurnProgress,
};
use tactics_core::state::ModifiedStat;
use tactics_runtime::{
    ActionResponse, CombatAction, CombatOrchestrator, RuntimeConfig, RuntimeError, Topic,
};

const HERO: EntityId = EntityId(1);
const GOBLIN: EntityId = EntityId(7);

fn content() -> Content {
    let mut catalog = AbilityCatalog::new();
    catalog
        .register(
            "strike",
            AbilityDraft::new("Strike", AbilityType::Active, "combat", 100.0)
                .ap_cost(1)
                .range(1)
                .requires_target()
                .effect("damage", 50.0, ScalingMode::None),
        )
        .unwrap();
    catalog
        .register(
            "step",
            AbilityDraft::new("Step", AbilityType::Active, "mobility", 100.0)
                .ap_cost(1)
                .range(3)
                .effect("movement", 1.0, ScalingMode::None),
        )
        .unwrap();
    catalog
        .register(
            "guard",
            AbilityDraft::new("Guard", AbilityType::Active, "defensive", 100.0)
                .ap_cost(1)
                .cooldown(2)
                .inflicts("braced", 100.0, 2)
                .effect("defenseBonus", 3.0, ScalingMode::None)
                .effect("duration", 2.0, ScalingMode::None),
        )
        .unwrap();

    let mut ledger = StatusEffectLedger::new();
    ledger
        .register(StatusEffectDefinition::new("braced", StatusKind::Buff))
        .unwrap();

    Content {
        catalog,
        ledger,
        tracker: SkillProgressionTracker::new(["melee"]),
        config: CombatConfig::new(),
        party: Vec::new(),
        bestiary: Vec::new(),
    }
}

fn orchestrator() -> CombatOrchestrator {
    orchestrator_with(&["strike", "step"])
}

fn orchestrator_with(slotted: &[&str]) -> CombatOrchestrator {
    let content = content();
    let mut hero = Entity::player(HERO, "hero")
        .with_health(200)
        .with_action_points(4);
    content.tracker.initialize(&mut hero);
    let slots = AbilitySlotManager::new(&content.catalog);
    for (index, key) in slotted.iter().enumerate() {
        slots.slot(&mut hero, key, SlotKind::Active, index).unwrap();
    }

    let mut orchestrator = CombatOrchestrator::new(content, RuntimeConfig::default().with_seed(7));
    orchestrator.add_party_member(hero).unwrap();
    orchestrator
}

fn goblin() -> Entity {
    Entity::enemy(
        GOBLIN,
        "goblin",
        EnemyProfile {
            tier: 1,
            role: EnemyRole::Skirmisher,
        },
    )
    .with_health(10)
    .with_position(Position::new(1, 0))
}

#[tokio::test]
async fn start_combat_publishes_and_waits_for_the_player() {
    let mut orchestrator = orchestrator();
    let mut turns = orchestrator.subscribe(Topic::Turn);

    let progress = orchestrator.start_combat(vec![goblin()]).unwrap();
    assert_eq!(progress, TurnProgress::AwaitingPlayer(HERO));
    assert!(orchestrator.in_combat());

    let first = turns.recv().await.unwrap();
    assert!(matches!(first.event, CombatEvent::CombatStarted { .. }));
    assert_eq!(first.round, 1);
    assert_eq!(first.sequence, 0);
}

#[tokio::test]
async fn killing_the_last_enemy_ends_the_encounter() {
    let mut orchestrator = orchestrator();
    let mut turns = orchestrator.subscribe(Topic::Turn);
    orchestrator.start_combat(vec![goblin()]).unwrap();

    let goblin_position = orchestrator.entity(GOBLIN).unwrap().position;
    let hero_position = orchestrator.entity(HERO).unwrap().position;
    assert_eq!(hero_position.manhattan_distance(goblin_position), 1);

    let response = orchestrator
        .handle_action(CombatAction::use_skill_on(HERO, "strike", GOBLIN))
        .unwrap();
    let ActionResponse::SkillUsed { outcome, progress } = response else {
        panic!("expected a skill response");
    };
    assert!(outcome.success);
    let Some(TurnProgress::Ended(summary)) = progress else {
        panic!("expected the encounter to end");
    };
    assert_eq!(summary.outcome, CombatOutcome::Victory);

    assert!(!orchestrator.in_combat());
    assert!(orchestrator.entity(GOBLIN).is_none());
    assert!(!orchestrator.entity(HERO).unwrap().in_combat);

    let mut last = None;
    while let Ok(event) = turns.try_recv() {
        last = Some(event);
    }
    let last = last.unwrap();
    assert!(matches!(last.event, CombatEvent::CombatEnded { .. }));

    let err = orchestrator.end_turn(HERO).unwrap_err();
    assert!(matches!(err, RuntimeError::NoEncounter));
}

#[test]
fn only_the_acting_entity_may_act() {
    let mut orchestrator = orchestrator();
    orchestrator.start_combat(vec![goblin()]).unwrap();

    let err = orchestrator
        .handle_action(CombatAction::end_turn(GOBLIN))
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::NotYourTurn {
            expected: HERO,
            provided: GOBLIN
        }
    ));

    let err = orchestrator
        .handle_action(CombatAction::end_turn(EntityId(99)))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::EntityNotFound(EntityId(99))));
}

#[test]
fn encounters_cannot_overlap_or_start_without_a_party() {
    let mut orchestrator = orchestrator();
    orchestrator.start_combat(vec![goblin()]).unwrap();
    let mut second = goblin();
    second.id = EntityId(8);
    assert!(matches!(
        orchestrator.start_combat(vec![second]),
        Err(RuntimeError::EncounterActive)
    ));

    let mut empty = CombatOrchestrator::new(content(), RuntimeConfig::default().with_seed(1));
    assert!(matches!(
        empty.start_combat(vec![goblin()]),
        Err(RuntimeError::NoLivingParty)
    ));

    let mut solo = self::orchestrator();
    assert!(matches!(solo.start_combat(Vec::new()), Err(RuntimeError::NoEnemies)));
}

#[test]
fn movement_outside_the_room_is_rejected() {
    let mut orchestrator = orchestrator().with_oracle(RoomBounds {
        width: 4,
        height: 4,
    });

    let err = orchestrator
        .handle_action(CombatAction::UseSkill {
            entity_id: HERO,
            ability: "step".into(),
            target: None,
            target_position: Some(Position::new(-1, 0)),
        })
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidPosition(_)));
    assert_eq!(orchestrator.entity(HERO).unwrap().action_points.current, 4);
}

#[test]
fn json_requests_round_through_the_snapshot() {
    let mut orchestrator = orchestrator();
    orchestrator.start_combat(vec![goblin()]).unwrap();

    let response = orchestrator
        .handle_json(r#"{"type":"getCombatState"}"#)
        .unwrap();
    let ActionResponse::CombatState { snapshot } = response else {
        panic!("expected a state response");
    };
    assert_eq!(snapshot.phase, CombatPhase::Combat);
    assert_eq!(snapshot.round, 1);
    assert_eq!(snapshot.current, Some(HERO));
    assert_eq!(snapshot.order.len(), 2);
    let hero = snapshot.entity(HERO).unwrap();
    assert_eq!(hero.slotted, vec!["strike".to_owned(), "step".to_owned()]);

    let err = orchestrator.handle_json(r#"{"type":"castSpell"}"#).unwrap_err();
    assert!(matches!(err, RuntimeError::MalformedAction(_)));
}

#[test]
fn swap_lock_counts_down_during_exploration() {
    let mut orchestrator = orchestrator();
    orchestrator.start_combat(vec![goblin()]).unwrap();
    let summary = orchestrator.end_combat(false).unwrap();
    assert_eq!(summary.outcome, CombatOutcome::Defeat);

    let lock = orchestrator.content().config.swap_cooldown_turns;
    assert_eq!(orchestrator.entity(HERO).unwrap().slots.swap_cooldown, lock);
    orchestrator.exploration_tick();
    assert_eq!(
        orchestrator.entity(HERO).unwrap().slots.swap_cooldown,
        lock.saturating_sub(1)
    );
    assert!(matches!(orchestrator.end_combat(true), Err(RuntimeError::NoEncounter)));
}

#[test]
fn movement_onto_an_occupied_tile_is_rejected() {
    let mut orchestrator = orchestrator();
    orchestrator.start_combat(vec![goblin()]).unwrap();
    let goblin_position = orchestrator.entity(GOBLIN).unwrap().position;
    let hero_position = orchestrator.entity(HERO).unwrap().position;

    let err = orchestrator
        .handle_action(CombatAction::UseSkill {
            entity_id: HERO,
            ability: "step".into(),
            target: None,
            target_position: Some(goblin_position),
        })
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidPosition(position) if position == goblin_position));
    let hero = orchestrator.entity(HERO).unwrap();
    assert_eq!(hero.position, hero_position);
    assert_eq!(hero.action_points.current, 4);

    let free = Position::new(hero_position.x, hero_position.y + 1);
    orchestrator
        .handle_action(CombatAction::UseSkill {
            entity_id: HERO,
            ability: "step".into(),
            target: None,
            target_position: Some(free),
        })
        .unwrap();
    assert_eq!(orchestrator.entity(HERO).unwrap().position, free);
}

#[test]
fn exploration_ticks_expire_abilities_used_outside_combat() {
    let mut orchestrator = orchestrator_with(&["guard"]);
    let response = orchestrator
        .handle_action(CombatAction::use_skill(HERO, "guard"))
        .unwrap();
    assert!(matches!(response, ActionResponse::SkillUsed { progress: None, .. }));

    let hero = orchestrator.entity(HERO).unwrap();
    assert_eq!(hero.cooldown("guard"), 2);
    assert_eq!(hero.statuses.get("braced").unwrap().remaining, 2);
    assert_eq!(hero.modifiers.total(ModifiedStat::Defense), 3);

    orchestrator.exploration_tick();
    let hero = orchestrator.entity(HERO).unwrap();
    assert_eq!(hero.cooldown("guard"), 1);
    assert_eq!(hero.statuses.get("braced").unwrap().remaining, 1);
    assert_eq!(hero.modifiers.total(ModifiedStat::Defense), 3);

    orchestrator.exploration_tick();
    let hero = orchestrator.entity(HERO).unwrap();
    assert_eq!(hero.cooldown("guard"), 0);
    assert!(hero.ability_cooldowns.is_empty());
    assert!(hero.statuses.is_empty());
    assert!(hero.modifiers.is_empty());
}
