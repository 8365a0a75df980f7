//! Initiative rolls and turn-order construction.

use crate::config::CombatConfig;
use crate::rng::Dice;
use crate::state::{Entity, TurnEntry};

/// `d20 + entity bonus + floor bonus`.
pub fn roll_initiative(entity: &Entity, config: &CombatConfig, dice: &mut dyn Dice) -> i32 {
    let die = dice.roll_die(CombatConfig::INITIATIVE_DIE) as i32;
    die + entity.stats.initiative_bonus + config.floor_initiative_bonus()
}

/// Rolls for every participant in the given order and sorts descending.
///
/// The sort is stable, so ties keep the order participants were passed in.
pub fn build_order<'e>(
    participants: impl IntoIterator<Item = &'e Entity>,
    config: &CombatConfig,
    dice: &mut dyn Dice,
) -> Vec<TurnEntry> {
    let mut order: Vec<TurnEntry> = participants
        .into_iter()
        .map(|entity| TurnEntry {
            entity: entity.id,
            side: entity.side,
            initiative: roll_initiative(entity, config, dice),
        })
        .collect();
    order.sort_by(|a, b| b.initiative.cmp(&a.initiative));
    order
}
