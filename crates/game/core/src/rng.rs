//! Dice for every stochastic roll in combat.
//!
//! Success rolls, initiative, damage ranges and stun chances all draw from a
//! [`Dice`] implementation passed in by the caller. Nothing in the core reaches
//! for a global RNG, so the same seed always replays the same encounter.

/// Source of random numbers for combat resolution.
pub trait Dice {
    /// Generate the next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, 100)`. Used for success and stun rolls.
    fn roll_percent(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0) * 100.0
    }

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        (self.next_u32() % sides) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32() % range)
    }
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn roll_percent(&mut self) -> f64 {
        (**self).roll_percent()
    }

    fn roll_die(&mut self, sides: u32) -> u32 {
        (**self).roll_die(sides)
    }

    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        (**self).range_inclusive(min, max)
    }
}

impl<D: Dice + ?Sized> Dice for Box<D> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn roll_percent(&mut self) -> f64 {
        (**self).roll_percent()
    }

    fn roll_die(&mut self, sides: u32) -> u32 {
        (**self).roll_die(sides)
    }

    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        (**self).range_inclusive(min, max)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// - **Deterministic**: Same seed always produces same sequence
/// - **Fast**: Single multiply + xorshift + rotate
/// - **Small state**: Only 64 bits
///
/// Reference: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgDice {
    state: u64,
}

impl PcgDice {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        // Scramble the seed once so nearby seeds diverge immediately.
        let mut dice = Self {
            state: seed.wrapping_add(Self::INCREMENT),
        };
        dice.step();
        dice
    }

    #[inline]
    fn step(&mut self) -> u64 {
        let old = self.state;
        self.state = old
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        old
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Dice for PcgDice {
    fn next_u32(&mut self) -> u32 {
        let state = self.step();
        Self::output(state)
    }
}

/// A single pre-recorded roll for [`ScriptedDice`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptedRoll {
    /// Returned verbatim from `roll_percent`.
    Percent(f64),
    /// Returned verbatim from `roll_die` / `range_inclusive` (clamped into range).
    Value(u32),
}

/// Replays a fixed list of rolls, then falls back to a default.
///
/// Used by tests and replays where the exact outcome of every roll matters.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    rolls: Vec<ScriptedRoll>,
    cursor: usize,
    fallback_percent: f64,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = ScriptedRoll>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            cursor: 0,
            fallback_percent: 0.0,
        }
    }

    /// Dice whose percentile rolls always come up `percent`.
    pub fn always(percent: f64) -> Self {
        Self {
            rolls: Vec::new(),
            cursor: 0,
            fallback_percent: percent,
        }
    }

    /// Number of scripted rolls consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    fn next_scripted(&mut self) -> Option<ScriptedRoll> {
        let roll = self.rolls.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(roll)
    }
}

impl Dice for ScriptedDice {
    fn next_u32(&mut self) -> u32 {
        match self.next_scripted() {
            Some(ScriptedRoll::Value(v)) => v,
            Some(ScriptedRoll::Percent(p)) => p as u32,
            None => 0,
        }
    }

    fn roll_percent(&mut self) -> f64 {
        match self.next_scripted() {
            Some(ScriptedRoll::Percent(p)) => p,
            Some(ScriptedRoll::Value(v)) => f64::from(v),
            None => self.fallback_percent,
        }
    }

    fn roll_die(&mut self, sides: u32) -> u32 {
        match self.next_scripted() {
            Some(ScriptedRoll::Value(v)) => v.clamp(1, sides.max(1)),
            Some(ScriptedRoll::Percent(p)) => (p as u32).clamp(1, sides.max(1)),
            None => 1,
        }
    }

    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        match self.next_scripted() {
            Some(ScriptedRoll::Value(v)) => v.clamp(min, max.max(min)),
            Some(ScriptedRoll::Percent(p)) => (p as u32).clamp(min, max.max(min)),
            None => min,
        }
    }
}
