//! Effect application primitives shared by ability resolution, status ticks
//! and the enemy AI.

use crate::event::{CombatEvent, EventSink};
use crate::oracle::PositionOracle;
use crate::state::{ActiveStatus, Entity, EntityId, ModifiedStat, Position, Roster, TimedModifier};
use crate::status::StatusEffectLedger;

/// Status property adding flat defense per stack (e.g. `fortified`).
pub const DEFENSE_PROPERTY: &str = "defense";

/// Status property subtracted from the AP restored at turn start (e.g. `slowed`).
pub const AP_PENALTY_PROPERTY: &str = "ap_penalty";

/// Armor after piercing, including status-granted defense.
pub fn effective_defense(ledger: &StatusEffectLedger, entity: &Entity) -> f64 {
    let from_statuses: f64 = entity
        .statuses
        .iter()
        .filter_map(|(key, status)| {
            ledger
                .calculate_strength(key, DEFENSE_PROPERTY, entity)
                .map(|per_stack| per_stack * f64::from(status.stacks))
        })
        .sum();
    f64::from(entity.effective_defense()) + from_statuses
}

/// Damage that gets through armor and damage reduction.
///
/// `max(1, floor(raw - defense × (1 - piercing)))`, then reduced by the
/// target's damage-reduction percentage, still never below 1. A raw value of
/// zero or less deals nothing.
pub fn mitigated_damage(raw: f64, defense: f64, armor_piercing: f64, damage_reduction: u32) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let piercing = armor_piercing.clamp(0.0, 1.0);
    let after_armor = (raw - defense * (1.0 - piercing)).floor().max(1.0);
    let kept = f64::from(100 - damage_reduction.min(100)) / 100.0;
    (after_armor * kept).floor().max(1.0).min(f64::from(u32::MAX)) as u32
}

/// Applies `raw` damage to `target`. Returns the health actually removed.
pub fn apply_damage(
    ledger: &StatusEffectLedger,
    target: &mut Entity,
    raw: f64,
    armor_piercing: f64,
) -> u32 {
    let dealt = mitigated_damage(
        raw,
        effective_defense(ledger, target),
        armor_piercing,
        target.stats.damage_reduction,
    );
    target.health.drain(dealt)
}

/// Flips `alive` and reports the death the first time health reaches zero.
pub fn check_death(
    entity: &mut Entity,
    killer: Option<EntityId>,
    events: &mut dyn EventSink,
) -> bool {
    if entity.alive && entity.health.is_empty() {
        entity.alive = false;
        events.emit(CombatEvent::EntityDied {
            entity: entity.id,
            killer,
        });
        return true;
    }
    false
}

/// Applies a status through the ledger's stacking and interaction rules.
///
/// Returns `None` when the status is unknown, the duration is zero, or the
/// entity is immune because of another active status. Applying a status
/// removes every active status that lists it in `removed_by`.
pub fn apply_status(
    ledger: &StatusEffectLedger,
    entity: &mut Entity,
    key: &str,
    duration: u32,
    source: Option<EntityId>,
    events: &mut dyn EventSink,
) -> Option<ActiveStatus> {
    let definition = ledger.get(key)?;
    if duration == 0 {
        return None;
    }
    let immune = definition
        .interactions
        .immunity_from
        .iter()
        .any(|other| entity.statuses.has(other));
    if immune {
        return None;
    }

    let cleansed: Vec<String> = entity
        .statuses
        .iter()
        .filter(|(other, _)| {
            ledger
                .get(other)
                .is_some_and(|d| d.interactions.removed_by.iter().any(|k| k == key))
        })
        .map(|(other, _)| other.clone())
        .collect();
    for other in cleansed {
        entity.statuses.remove(&other);
    }

    let add_stack = ledger.can_stack(key, entity.statuses.stacks(key));
    let status = entity.statuses.apply(key, duration, add_stack, source);
    events.emit(CombatEvent::StatusApplied {
        entity: entity.id,
        status: key.to_owned(),
        stacks: status.stacks,
        remaining: status.remaining,
    });
    Some(status)
}

/// Rounded destination of pushing `target` `distance` tiles directly away
/// from `origin`. `None` when both stand on the same tile.
pub fn knockback_destination(origin: Position, target: Position, distance: f64) -> Option<Position> {
    let dx = f64::from(target.x - origin.x);
    let dy = f64::from(target.y - origin.y);
    let length = dx.hypot(dy);
    if length == 0.0 || distance <= 0.0 {
        return None;
    }
    let step_x = (dx / length * distance).round() as i32;
    let step_y = (dy / length * distance).round() as i32;
    Some(Position::new(target.x + step_x, target.y + step_y))
}

/// Moves `target` to `destination` if the oracle accepts it and no other
/// living entity stands there. Returns the tiles moved.
pub fn try_relocate(
    roster: &mut Roster,
    target: EntityId,
    destination: Position,
    oracle: &dyn PositionOracle,
) -> u32 {
    if !oracle.is_valid_position(destination.x, destination.y)
        || roster.is_occupied(destination, Some(target))
    {
        return 0;
    }
    match roster.get_mut(target) {
        Some(entity) => {
            let moved = entity.position.manhattan_distance(destination);
            entity.position = destination;
            moved
        }
        None => 0,
    }
}

/// Adds a timed defense modifier.
pub fn grant_defense(entity: &mut Entity, amount: u32, duration: u32) -> bool {
    entity.modifiers.push(TimedModifier {
        stat: ModifiedStat::Defense,
        amount,
        remaining: duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaling::ScalingMode;
    use crate::status::{StatusEffectDefinition, StatusKind};

    #[test]
    fn armor_never_drops_damage_below_one() {
        assert_eq!(mitigated_damage(3.0, 10.0, 0.0, 0), 1);
        assert_eq!(mitigated_damage(12.0, 10.0, 0.0, 0), 2);
        assert_eq!(mitigated_damage(12.0, 10.0, 0.5, 0), 7);
        assert_eq!(mitigated_damage(12.0, 10.0, 3.0, 0), 12);
        assert_eq!(mitigated_damage(10.0, 0.0, 0.0, 50), 5);
        assert_eq!(mitigated_damage(10.0, 0.0, 0.0, 100), 1);
        assert_eq!(mitigated_damage(0.0, 0.0, 0.0, 0), 0);
    }

    #[test]
    fn damage_floors_health_at_zero() {
        let ledger = StatusEffectLedger::new();
        let mut rat = Entity::player(EntityId(1), "rat").with_health(3);
        assert_eq!(apply_damage(&ledger, &mut rat, 50.0, 0.0), 3);
        assert_eq!(rat.health.current, 0);

        let mut events: Vec<CombatEvent> = Vec::new();
        assert!(check_death(&mut rat, Some(EntityId(2)), &mut events));
        assert!(!check_death(&mut rat, Some(EntityId(2)), &mut events));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn status_defense_counts_per_stack() {
        let mut ledger = StatusEffectLedger::new();
        ledger
            .register(
                StatusEffectDefinition::new("fortified", StatusKind::Buff)
                    .stackable(2)
                    .with_property(DEFENSE_PROPERTY, 2.0, ScalingMode::None),
            )
            .unwrap();
        let mut knight = Entity::player(EntityId(1), "knight");
        let mut events: Vec<CombatEvent> = Vec::new();
        apply_status(&ledger, &mut knight, "fortified", 3, None, &mut events);
        apply_status(&ledger, &mut knight, "fortified", 3, None, &mut events);
        apply_status(&ledger, &mut knight, "fortified", 3, None, &mut events);
        assert_eq!(knight.statuses.stacks("fortified"), 2);
        assert_eq!(effective_defense(&ledger, &knight), 4.0);
    }

    #[test]
    fn interactions_cleanse_and_grant_immunity() {
        let mut ledger = StatusEffectLedger::new();
        let mut burning = StatusEffectDefinition::new("burning", StatusKind::DamageOverTime);
        burning.interactions.removed_by.push("soaked".into());
        let mut frozen = StatusEffectDefinition::new("frozen", StatusKind::Incapacitation);
        frozen.interactions.immunity_from.push("burning".into());
        ledger.register(burning).unwrap();
        ledger.register(frozen).unwrap();
        ledger
            .register(StatusEffectDefinition::new("soaked", StatusKind::Debuff))
            .unwrap();

        let mut imp = Entity::player(EntityId(1), "imp");
        let mut events: Vec<CombatEvent> = Vec::new();
        apply_status(&ledger, &mut imp, "burning", 2, None, &mut events).unwrap();
        assert!(apply_status(&ledger, &mut imp, "frozen", 2, None, &mut events).is_none());

        apply_status(&ledger, &mut imp, "soaked", 2, None, &mut events).unwrap();
        assert!(!imp.statuses.has("burning"));
        assert!(imp.statuses.has("soaked"));
        assert!(apply_status(&ledger, &mut imp, "frozen", 2, None, &mut events).is_some());
        assert!(apply_status(&ledger, &mut imp, "ghost", 2, None, &mut events).is_none());
    }

    #[test]
    fn knockback_pushes_along_the_displacement() {
        let origin = Position::new(0, 0);
        assert_eq!(
            knockback_destination(origin, Position::new(1, 0), 2.0),
            Some(Position::new(3, 0))
        );
        assert_eq!(
            knockback_destination(origin, Position::new(1, 1), 2.0),
            Some(Position::new(2, 2))
        );
        assert_eq!(knockback_destination(origin, origin, 2.0), None);
    }
}
