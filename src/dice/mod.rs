//! # Dice System
//!
//! Roll primitives and composite checks. The roller is generic over any
//! [`rand::Rng`] so tests and replays can inject a seeded generator; the
//! engine itself never reaches for ambient randomness.

use crate::constants::{CATASTROPHIC_MARGIN, D20_SIDES, D6_SIDES, DAMAGE_DICE_COUNT, EXPLODE_ON};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// A single check: the raw die roll and the total after bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub roll: u32,
    pub total: i32,
}

/// Outcome of a survival check against excess damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurvivalResult {
    pub roll: u32,
    pub dc: u32,
    pub survived: bool,
    /// Failed by 20 or more
    pub catastrophic: bool,
}

/// Dice roller with an injectable random source.
///
/// # Examples
///
/// ```
/// use vitality::DiceRoller;
///
/// let mut dice = DiceRoller::seeded(7);
/// let roll = dice.d20();
/// assert!((1..=20).contains(&roll));
///
/// // Seeded rollers are reproducible.
/// let a: Vec<u32> = (0..5).map(|_| DiceRoller::seeded(42).d20()).collect();
/// assert!(a.windows(2).all(|w| w[0] == w[1]));
/// ```
#[derive(Debug)]
pub struct DiceRoller<R: Rng> {
    rng: R,
}

impl DiceRoller<StdRng> {
    /// Reproducible roller from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Roller seeded from the OS entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> DiceRoller<R> {
    /// Wraps an existing random source.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform roll in 1..=20.
    pub fn d20(&mut self) -> u32 {
        self.rng.gen_range(1..=D20_SIDES)
    }

    /// Exploding d6: rolling a 6 accumulates and rolls again.
    pub fn d6_exploding(&mut self) -> u32 {
        let mut total = 0;
        loop {
            let roll = self.rng.gen_range(1..=D6_SIDES);
            total += roll;
            if roll != EXPLODE_ON {
                return total;
            }
        }
    }

    /// Damage roll: the sum of three independent exploding d6.
    pub fn damage_roll(&mut self) -> u32 {
        (0..DAMAGE_DICE_COUNT).map(|_| self.d6_exploding()).sum()
    }

    /// d20 plus a deterministic base plus caller-supplied bonuses.
    pub fn check(&mut self, base: i32, bonus: i32) -> CheckResult {
        let roll = self.d20();
        CheckResult {
            roll,
            total: roll as i32 + base + bonus,
        }
    }

    /// Accuracy check: d20 + tier + focus + bonuses.
    pub fn accuracy_check(&mut self, tier: u8, focus: u8, bonus: i32) -> CheckResult {
        self.check(i32::from(tier) + i32::from(focus), bonus)
    }

    /// Condition check: d20 + tier * 2 + bonuses.
    pub fn condition_check(&mut self, tier: u8, bonus: i32) -> CheckResult {
        self.check(i32::from(tier) * 2, bonus)
    }

    /// Skill check: d20 + tier + the relevant attribute + bonuses.
    pub fn skill_check(&mut self, tier: u8, attribute: u8, bonus: i32) -> CheckResult {
        self.check(i32::from(tier) + i32::from(attribute), bonus)
    }

    /// Initiative check: d20 + tier + mobility + awareness.
    pub fn initiative_check(&mut self, tier: u8, mobility: u8, awareness: u8) -> CheckResult {
        self.check(
            i32::from(tier) + i32::from(mobility) + i32::from(awareness),
            0,
        )
    }

    /// Damage check: exploding damage dice + a deterministic damage base.
    pub fn damage_check(&mut self, base: i32, bonus: i32) -> CheckResult {
        let roll = self.damage_roll();
        CheckResult {
            roll,
            total: roll as i32 + base + bonus,
        }
    }

    /// Survival check: d20 against a DC equal to the damage taken past
    /// zero HP. Failing by 20 or more is catastrophic.
    pub fn survival_check(&mut self, excess_damage: u32) -> SurvivalResult {
        let roll = self.d20();
        let survived = roll >= excess_damage;
        let shortfall = excess_damage as i32 - roll as i32;
        SurvivalResult {
            roll,
            dc: excess_damage,
            survived,
            catastrophic: !survived && shortfall >= CATASTROPHIC_MARGIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d20_in_range() {
        let mut dice = DiceRoller::seeded(1);
        for _ in 0..200 {
            let roll = dice.d20();
            assert!((1..=20).contains(&roll));
        }
    }

    #[test]
    fn test_seeded_rolls_reproducible() {
        let rolls = |seed| -> Vec<u32> {
            let mut dice = DiceRoller::seeded(seed);
            (0..10).map(|_| dice.d20()).collect()
        };
        assert_eq!(rolls(99), rolls(99));
        assert_ne!(rolls(99), rolls(100));
    }

    #[test]
    fn test_exploding_d6_at_least_one_per_die() {
        let mut dice = DiceRoller::seeded(2);
        for _ in 0..200 {
            let roll = dice.d6_exploding();
            assert!(roll >= 1);
            // the chain always ends on a 1-5, so totals are never 0 mod 6
            assert!(roll % 6 != 0, "exploding chain cannot end on a 6: {}", roll);
        }
    }

    #[test]
    fn test_damage_roll_minimum() {
        let mut dice = DiceRoller::seeded(3);
        for _ in 0..100 {
            assert!(dice.damage_roll() >= 3);
        }
    }

    #[test]
    fn test_check_adds_base_and_bonus() {
        let mut dice = DiceRoller::seeded(4);
        let result = dice.accuracy_check(4, 2, 1);
        assert_eq!(result.total, result.roll as i32 + 7);
    }

    #[test]
    fn test_survival_check_boundaries() {
        let mut dice = DiceRoller::seeded(5);
        // DC 1 always survives, DC 0 trivially survives
        for _ in 0..50 {
            assert!(dice.survival_check(1).survived);
        }
        // DC 40 can never succeed and always fails by at least 20
        for _ in 0..50 {
            let result = dice.survival_check(40);
            assert!(!result.survived);
            assert!(result.catastrophic);
        }
        // DC 20 fails on anything but a natural 20, never catastrophically
        for _ in 0..50 {
            let result = dice.survival_check(20);
            if !result.survived {
                assert!(!result.catastrophic);
            }
        }
    }
}
