//! The shipped tables load, validate and spawn playable combatants.

use tactics_content::{ContentFactory, bundled};
use tactics_core::{
    EntityId, NullSink, OpenField, Position, ResolveContext, Roster, ScriptedDice, SlotKind,
    StatusEffectLedger, UseRequest, resolve::effective_defense,
};

#[test]
fn embedded_tables_validate() {
    let content = bundled::load().unwrap();
    assert_eq!(content.catalog.len(), 14);
    assert_eq!(content.ledger.iter().count(), 5);
    assert!(content.catalog.get("wait").unwrap().always_resolves());
    assert_eq!(content.party.len(), 2);
    assert!(content.bestiary_entry("orc").is_some());
}

#[test]
fn data_directory_matches_embedded_tables() {
    let factory = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
    let from_disk = factory.load_all().unwrap();
    let embedded = bundled::load().unwrap();
    assert_eq!(from_disk.catalog.len(), embedded.catalog.len());
    assert_eq!(from_disk.config, embedded.config);
}

#[test]
fn dangling_status_reference_fails_validation() {
    let mut content = bundled::load().unwrap();
    content.ledger = StatusEffectLedger::new();
    let err = content.validate().unwrap_err().to_string();
    assert!(err.contains("unknown status") || err.contains("stun"), "{err}");
}

#[test]
fn party_members_slot_in_listed_order() {
    let content = bundled::load().unwrap();
    let fighter = content
        .party_member("fighter")
        .unwrap()
        .spawn(EntityId(1), Position::ORIGIN, &content.tracker, &content.slots())
        .unwrap();
    assert_eq!(fighter.slots.occupied(SlotKind::Active), 8);
    assert_eq!(fighter.slots.occupied(SlotKind::Passive), 2);
    assert_eq!(
        fighter.slots.get(SlotKind::Active, 0).map(String::as_str),
        Some("basic_attack")
    );
    assert_eq!(fighter.skills.level("melee"), 6);
    assert!(fighter.unlocked_abilities.contains("power_strike"));
}

#[test]
fn enemies_are_auto_slotted_by_role() {
    let content = bundled::load().unwrap();
    let skeleton = content
        .bestiary_entry("skeleton")
        .unwrap()
        .spawn(EntityId(7), Position::new(2, 0), &content.tracker, &content.slots())
        .unwrap();
    let actives: Vec<&str> = skeleton
        .slots
        .slotted(SlotKind::Active)
        .map(String::as_str)
        .collect();
    assert_eq!(actives, ["shield_bash", "defensive_stance", "basic_attack"]);
    assert_eq!(
        skeleton.slots.get(SlotKind::Passive, 0).map(String::as_str),
        Some("iron_skin")
    );
}

#[test]
fn fighter_passives_raise_defense() {
    let content = bundled::load().unwrap();
    let mut roster = Roster::new();
    roster.insert(
        content
            .party_member("fighter")
            .unwrap()
            .spawn(EntityId(1), Position::ORIGIN, &content.tracker, &content.slots())
            .unwrap(),
    );
    roster.insert(
        content
            .bestiary_entry("goblin")
            .unwrap()
            .spawn(EntityId(2), Position::new(1, 0), &content.tracker, &content.slots())
            .unwrap(),
    );

    let engine = content.engine();
    let mut dice = ScriptedDice::new([]);
    let mut sink = NullSink;
    let mut ctx = ResolveContext::new(&mut dice, &OpenField, &mut sink);
    let outcomes = engine.resolve_passives(&mut roster, EntityId(1), &mut ctx);
    assert_eq!(outcomes.len(), 2);

    let fighter = roster.get(EntityId(1)).unwrap();
    // 1 base + 2 shield + 2 iron skin + 2 from one fortified stack.
    assert_eq!(effective_defense(&content.ledger, fighter), 7.0);
    assert!(
        engine
            .check(&roster, &UseRequest::new(EntityId(1), "cleave").on(EntityId(2)))
            .is_ok()
    );
}
