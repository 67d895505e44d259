//! # Combat Calculator
//!
//! Illustrative turn resolution on top of the dice system and derived
//! stats. This is peripheral to the budget engine: the builder uses it for
//! the demo roll command and for sanity-checking finished characters, not
//! for any point math.

use crate::dice::{CheckResult, DiceRoller, SurvivalResult};
use crate::engine::stats::StatLine;
use rand::Rng;
use serde::Serialize;

/// Full resolution of one attack against one defender.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttackOutcome {
    pub accuracy: CheckResult,
    pub hit: bool,
    /// Raw exploding damage dice (0 on a miss)
    pub damage_roll: u32,
    /// Dice plus the attacker's damage stat
    pub damage_total: f64,
    /// Damage after the defender's durability, floored at zero
    pub damage_dealt: f64,
    /// Rolled only when damage exceeds the defender's remaining HP
    pub survival: Option<SurvivalResult>,
}

/// Resolves a single attack: accuracy against avoidance, then exploding
/// damage dice against durability, then a survival check if the blow would
/// drop the defender past zero HP.
pub fn resolve_attack<R: Rng>(
    attacker: &StatLine,
    defender: &StatLine,
    dice: &mut DiceRoller<R>,
) -> AttackOutcome {
    let accuracy = dice.check(attacker.accuracy.round() as i32, 0);
    let hit = f64::from(accuracy.total) >= defender.avoidance;

    if !hit {
        return AttackOutcome {
            accuracy,
            hit,
            damage_roll: 0,
            damage_total: 0.0,
            damage_dealt: 0.0,
            survival: None,
        };
    }

    let damage_roll = dice.damage_roll();
    let damage_total = f64::from(damage_roll) + attacker.damage;
    let damage_dealt = (damage_total - defender.durability).max(0.0);

    let survival = if damage_dealt > defender.hp {
        let excess = (damage_dealt - defender.hp).ceil() as u32;
        Some(dice.survival_check(excess))
    } else {
        None
    };

    AttackOutcome {
        accuracy,
        hit,
        damage_roll,
        damage_total,
        damage_dealt,
        survival,
    }
}
