/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Dungeon floor of the current encounter. Feeds the initiative floor bonus.
    pub current_floor: u32,

    /// Turns during which slots stay locked after an encounter ends.
    pub swap_cooldown_turns: u32,

    /// Upper bound on AI sub-steps an enemy may take within one turn.
    pub max_ai_steps: u32,

    /// Stun duration used when an ability declares `stunChance` but no `stunDuration`.
    pub default_stun_duration: u32,

    /// Buff duration used when an ability declares `defenseBonus` but no `duration`.
    pub default_buff_duration: u32,
}

impl CombatConfig {
    // ===== compile-time constants =====
    pub const ACTIVE_SLOTS: usize = 9;
    pub const PASSIVE_SLOTS: usize = 5;
    pub const MAX_SKILL_LEVEL: u32 = 100;
    /// Success rates are clamped so no ability is guaranteed or impossible.
    pub const MIN_SUCCESS_RATE: f64 = 5.0;
    pub const MAX_SUCCESS_RATE: f64 = 95.0;
    /// Share of the effective AP cost consumed by a failed success roll.
    pub const FAILED_ROLL_AP_PERCENT: u32 = 30;
    /// `low_health_only` abilities require health at or below this share of max.
    pub const LOW_HEALTH_PERCENT: u32 = 25;
    pub const INITIATIVE_DIE: u32 = 20;
    pub const MAX_TIMED_MODIFIERS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FLOOR: u32 = 1;
    pub const DEFAULT_SWAP_COOLDOWN_TURNS: u32 = 1;
    pub const DEFAULT_MAX_AI_STEPS: u32 = 8;
    pub const DEFAULT_STUN_DURATION: u32 = 1;
    pub const DEFAULT_BUFF_DURATION: u32 = 2;

    pub fn new() -> Self {
        Self {
            current_floor: Self::DEFAULT_FLOOR,
            swap_cooldown_turns: Self::DEFAULT_SWAP_COOLDOWN_TURNS,
            max_ai_steps: Self::DEFAULT_MAX_AI_STEPS,
            default_stun_duration: Self::DEFAULT_STUN_DURATION,
            default_buff_duration: Self::DEFAULT_BUFF_DURATION,
        }
    }

    pub fn with_floor(mut self, floor: u32) -> Self {
        self.current_floor = floor.max(1);
        self
    }

    /// Initiative bonus granted to every participant on the current floor.
    pub fn floor_initiative_bonus(&self) -> i32 {
        (self.current_floor.saturating_sub(1) * 2) as i32
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_bonus_grows_two_per_floor() {
        assert_eq!(CombatConfig::new().floor_initiative_bonus(), 0);
        assert_eq!(CombatConfig::new().with_floor(3).floor_initiative_bonus(), 4);
        // Floor 0 is treated as floor 1
        assert_eq!(CombatConfig::new().with_floor(0).floor_initiative_bonus(), 0);
    }
}
