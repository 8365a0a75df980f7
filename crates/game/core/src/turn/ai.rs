//! Enemy AI as a behavior tree.
//!
//! One AI turn is
//!
//! ```text
//! Repeat (up to max_ai_steps)
//! └── Selector
//!     ├── Sequence: has AP → nearest foe → adjacent → basic attack
//!     └── Sequence: has AP → nearest foe → step toward
//! ```
//!
//! The turn ends when neither branch can act, which also covers a foe side
//! that has been wiped out.

use behavior_tree::{Behavior, Node, Repeat, Selector, Sequence, Status};

use crate::event::CombatEvent;
use crate::resolve::{ResolveContext, apply_damage, check_death};
use crate::state::{EntityId, Roster};
use crate::status::StatusEffectLedger;

/// Blackboard shared by the nodes of one AI turn.
pub struct AiContext<'x, 'r> {
    pub roster: &'x mut Roster,
    pub ledger: &'x StatusEffectLedger,
    pub actor: EntityId,
    pub target: Option<EntityId>,
    pub resolve: &'x mut ResolveContext<'r>,
}

/// Builds the tree for a single AI step.
pub fn enemy_step<'t, 'x: 't, 'r: 't>() -> Selector<'t, AiContext<'x, 'r>> {
    let attack: Vec<Node<'t, AiContext<'x, 'r>>> = vec![
        Box::new(has_action_points),
        Box::new(find_nearest_foe),
        Box::new(foe_is_adjacent),
        Box::new(basic_attack),
    ];
    let approach: Vec<Node<'t, AiContext<'x, 'r>>> = vec![
        Box::new(has_action_points),
        Box::new(find_nearest_foe),
        Box::new(step_toward_foe),
    ];
    Selector::new(vec![
        Box::new(Sequence::new(attack)),
        Box::new(Sequence::new(approach)),
    ])
}

/// A whole AI turn: [`enemy_step`] until it fails or `budget` steps ran.
pub fn enemy_turn<'t, 'x: 't, 'r: 't>(budget: u32) -> Repeat<'t, AiContext<'x, 'r>> {
    Repeat::new(Box::new(enemy_step()), budget)
}

/// Runs one AI turn for `ctx.actor`. Fails if the actor did nothing.
pub fn take_turn(ctx: &mut AiContext<'_, '_>, budget: u32) -> Status {
    enemy_turn(budget).tick(ctx)
}

fn has_action_points(ctx: &mut AiContext<'_, '_>) -> Status {
    Status::from(
        ctx.roster
            .get(ctx.actor)
            .is_some_and(|actor| actor.alive && actor.action_points.current > 0),
    )
}

/// Nearest living entity of the opposing side by Manhattan distance. Ties
/// go to the earlier roster entry.
fn find_nearest_foe(ctx: &mut AiContext<'_, '_>) -> Status {
    let Some(actor) = ctx.roster.get(ctx.actor) else {
        return Status::Failure;
    };
    let origin = actor.position;
    ctx.target = ctx
        .roster
        .living(actor.side.opposing())
        .min_by_key(|foe| origin.manhattan_distance(foe.position))
        .map(|foe| foe.id);
    Status::from(ctx.target.is_some())
}

fn foe_is_adjacent(ctx: &mut AiContext<'_, '_>) -> Status {
    let distance = ctx.target.and_then(|target| {
        let actor = ctx.roster.get(ctx.actor)?;
        let foe = ctx.roster.get(target)?;
        Some(actor.position.manhattan_distance(foe.position))
    });
    Status::from(distance == Some(1))
}

/// Rolls within the attacker's damage range, applies it, spends 1 AP.
fn basic_attack(ctx: &mut AiContext<'_, '_>) -> Status {
    let Some(target_id) = ctx.target else {
        return Status::Failure;
    };
    let Some(attacker) = ctx.roster.get_mut(ctx.actor) else {
        return Status::Failure;
    };
    attacker.action_points.drain(1);
    let range = attacker.stats.attack;
    let raw = ctx.resolve.dice.range_inclusive(range.min, range.max);

    let Some(target) = ctx.roster.get_mut(target_id) else {
        return Status::Failure;
    };
    let damage = apply_damage(ctx.ledger, target, f64::from(raw), 0.0);
    ctx.resolve.events.emit(CombatEvent::EnemyAttacked {
        entity: ctx.actor,
        target: target_id,
        damage,
    });
    check_death(target, Some(ctx.actor), ctx.resolve.events);
    Status::Success
}

/// One step along the axis with the larger delta, onto a valid free cell.
fn step_toward_foe(ctx: &mut AiContext<'_, '_>) -> Status {
    let Some(target_id) = ctx.target else {
        return Status::Failure;
    };
    let (Some(actor), Some(foe)) = (ctx.roster.get(ctx.actor), ctx.roster.get(target_id)) else {
        return Status::Failure;
    };
    let from = actor.position;
    let to = from.step_toward(foe.position);
    if to == from
        || to == foe.position
        || !ctx.resolve.oracle.is_valid_position(to.x, to.y)
        || ctx.roster.is_occupied(to, Some(ctx.actor))
    {
        return Status::Failure;
    }

    let Some(actor) = ctx.roster.get_mut(ctx.actor) else {
        return Status::Failure;
    };
    actor.position = to;
    actor.action_points.drain(1);
    ctx.resolve.events.emit(CombatEvent::EnemyMoved {
        entity: ctx.actor,
        from,
        to,
    });
    Status::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CombatEvent;
    use crate::oracle::{OpenField, PositionOracle, RoomBounds};
    use crate::rng::{ScriptedDice, ScriptedRoll};
    use crate::state::{CombatStats, DamageRange, EnemyProfile, EnemyRole, Entity, Position};

    fn arena(enemy_at: Position) -> Roster {
        let mut roster = Roster::new();
        roster.insert(
            Entity::player(EntityId(1), "hero")
                .with_health(20)
                .with_position(Position::new(0, 0)),
        );
        roster.insert(
            Entity::enemy(
                EntityId(2),
                "goblin",
                EnemyProfile {
                    tier: 1,
                    role: EnemyRole::Bruiser,
                },
            )
            .with_stats(CombatStats {
                attack: DamageRange::new(2, 4),
                ..CombatStats::default()
            })
            .with_position(enemy_at),
        );
        roster
    }

    fn run(
        roster: &mut Roster,
        dice: &mut ScriptedDice,
        oracle: &dyn PositionOracle,
    ) -> Vec<CombatEvent> {
        let ledger = StatusEffectLedger::new();
        let mut events: Vec<CombatEvent> = Vec::new();
        let mut resolve = ResolveContext::new(dice, oracle, &mut events);
        let mut ctx = AiContext {
            roster,
            ledger: &ledger,
            actor: EntityId(2),
            target: None,
            resolve: &mut resolve,
        };
        take_turn(&mut ctx, 10);
        drop(ctx);
        drop(resolve);
        events
    }

    #[test]
    fn adjacent_enemy_attacks_until_out_of_ap() {
        let mut roster = arena(Position::new(1, 0));
        let mut dice = ScriptedDice::new([
            ScriptedRoll::Value(4),
            ScriptedRoll::Value(2),
            ScriptedRoll::Value(3),
        ]);
        let events = run(&mut roster, &mut dice, &OpenField);
        assert_eq!(events.len(), 3);
        assert_eq!(roster.get(EntityId(1)).unwrap().health.current, 20 - 9);
        assert_eq!(roster.get(EntityId(2)).unwrap().action_points.current, 0);
    }

    #[test]
    fn distant_enemy_closes_in() {
        let mut roster = arena(Position::new(3, 1));
        let mut dice = ScriptedDice::new([]);
        let events = run(&mut roster, &mut dice, &OpenField);
        let path: Vec<Position> = events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::EnemyMoved { to, .. } => Some(*to),
                _ => None,
            })
            .collect();
        // Larger delta first; the final 1/1 tie moves along x.
        assert_eq!(
            path,
            [Position::new(2, 1), Position::new(1, 1), Position::new(0, 1)]
        );
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn blocked_step_ends_the_turn() {
        let mut roster = arena(Position::new(3, 0));
        let mut dice = ScriptedDice::new([]);
        let events = run(&mut roster, &mut dice, &|x: i32, _y: i32| x != 2);
        assert!(events.is_empty());
        assert_eq!(roster.get(EntityId(2)).unwrap().action_points.current, 3);
    }

    #[test]
    fn room_bounds_reject_outside_cells() {
        let room = RoomBounds {
            width: 3,
            height: 2,
        };
        assert!(room.is_valid_position(2, 1));
        assert!(!room.is_valid_position(3, 0));
        assert!(!room.is_valid_position(0, -1));
    }
}
