//! XP-to-level curve.
//!
//! The step between consecutive levels grows piecewise-linearly:
//!
//! | levels  | xp needed to reach level `L` from `L-1` |
//! |---------|------------------------------------------|
//! | 1-10    | `10 + 2L`                                |
//! | 11-30   | `30 + 5(L-10)`                           |
//! | 31-60   | `100 + 10(L-30)`                         |
//! | 61-100  | `200 + 20(L-60)`                         |

use crate::config::CombatConfig;

const LEVELS: usize = CombatConfig::MAX_SKILL_LEVEL as usize + 1;

const fn step(level: u64) -> u64 {
    if level <= 10 {
        10 + 2 * level
    } else if level <= 30 {
        30 + 5 * (level - 10)
    } else if level <= 60 {
        100 + 10 * (level - 30)
    } else {
        200 + 20 * (level - 60)
    }
}

const fn build_thresholds() -> [u64; LEVELS] {
    let mut table = [0u64; LEVELS];
    let mut level = 1;
    while level < LEVELS {
        table[level] = table[level - 1] + step(level as u64);
        level += 1;
    }
    table
}

/// Cumulative xp required to reach each level, indexed 0..=100.
pub const XP_THRESHOLDS: [u64; LEVELS] = build_thresholds();

/// Total xp required to reach `level` (clamped to the maximum level).
pub fn xp_threshold(level: u32) -> u64 {
    XP_THRESHOLDS[level.min(CombatConfig::MAX_SKILL_LEVEL) as usize]
}

/// Largest level whose threshold `xp` meets.
pub fn level_for_xp(xp: u64) -> u32 {
    // partition_point returns the count of thresholds <= xp; level 0 always qualifies.
    let reached = XP_THRESHOLDS.partition_point(|&threshold| threshold <= xp);
    (reached as u32).saturating_sub(1)
}
