//! # Effect Registries
//!
//! Archetype, boon and flaw effects as registries of pure functions. Each
//! entry produces the stat deltas (and non-numeric grants) for one id; the
//! stat pipeline applies the deltas *and* records them in the breakdown
//! trail, so a new effect registered here shows up in both automatically.
//! There is deliberately no second table to keep in sync.
//!
//! Unknown ids resolve to an empty outcome. Saved characters referencing
//! effects from other rule editions load and calculate; the missing effect
//! simply contributes nothing.

use crate::character::{ArchetypeCategory, DefenseKind, StatKind};
use super::stats::StatLine;

/// One additive stat contribution, labelled for the breakdown trail.
#[derive(Debug, Clone, PartialEq)]
pub struct StatDelta {
    pub stat: StatKind,
    pub amount: f64,
    pub source: String,
}

impl StatDelta {
    fn new(stat: StatKind, amount: f64, source: &str) -> Self {
        Self {
            stat,
            amount,
            source: source.to_string(),
        }
    }
}

/// Everything one archetype or boon does to the stat snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectOutcome {
    pub deltas: Vec<StatDelta>,
    pub immunities: Vec<&'static str>,
    pub vulnerabilities: Vec<&'static str>,
    /// Replaces the action count when set (e.g. Versatile Master)
    pub actions_per_turn: Option<u8>,
    /// Reroutes which defense condition effects target (e.g. Psychic Redirect)
    pub condition_target: Option<DefenseKind>,
}

type EffectFn = fn(u8) -> EffectOutcome;
type FlawPenaltyFn = fn(u8, &StatLine) -> Vec<StatDelta>;

/// Looks up the stat effect of a selected archetype. Attack-type,
/// special-attack and utility archetypes gate options and pool math rather
/// than stats, so their tables are empty here.
pub fn archetype_effect(category: ArchetypeCategory, id: &str, tier: u8) -> EffectOutcome {
    let registry: &[(&str, EffectFn)] = match category {
        ArchetypeCategory::Movement => MOVEMENT_EFFECTS,
        ArchetypeCategory::EffectType => EFFECT_TYPE_EFFECTS,
        ArchetypeCategory::UniqueAbility => UNIQUE_ABILITY_EFFECTS,
        ArchetypeCategory::Defensive => DEFENSIVE_EFFECTS,
        ArchetypeCategory::AttackType
        | ArchetypeCategory::SpecialAttack
        | ArchetypeCategory::Utility => &[],
    };
    lookup(registry, id, tier)
}

/// Looks up the effect of a purchased boon.
pub fn boon_effect(boon_id: &str, tier: u8) -> EffectOutcome {
    lookup(BOON_EFFECTS, boon_id, tier)
}

/// Final-stage penalty for a purchased flaw, applied after every bonus
/// stage. Takes the current stat line because some penalties zero a stat
/// outright rather than subtracting a constant.
pub fn flaw_penalty(flaw_id: &str, tier: u8, current: &StatLine) -> Vec<StatDelta> {
    FLAW_PENALTIES
        .iter()
        .find(|(id, _)| *id == flaw_id)
        .map(|(_, f)| f(tier, current))
        .unwrap_or_default()
}

fn lookup(registry: &[(&str, EffectFn)], id: &str, tier: u8) -> EffectOutcome {
    registry
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, f)| f(tier))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Movement archetypes
// ---------------------------------------------------------------------------

const MOVEMENT_EFFECTS: &[(&str, EffectFn)] = &[
    ("swift", swift),
    ("skirmisher", skirmisher),
    ("behemoth", behemoth),
    ("flight", flight),
];

fn swift(tier: u8) -> EffectOutcome {
    let bonus = (f64::from(tier) / 2.0).ceil();
    EffectOutcome {
        deltas: vec![StatDelta::new(StatKind::Movement, bonus, "Swift")],
        ..Default::default()
    }
}

fn skirmisher(_tier: u8) -> EffectOutcome {
    EffectOutcome {
        deltas: vec![StatDelta::new(StatKind::Movement, 1.0, "Skirmisher")],
        ..Default::default()
    }
}

fn behemoth(_tier: u8) -> EffectOutcome {
    EffectOutcome {
        immunities: vec!["forced_movement"],
        ..Default::default()
    }
}

fn flight(_tier: u8) -> EffectOutcome {
    EffectOutcome {
        immunities: vec!["difficult_terrain"],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Effect-type archetypes
// ---------------------------------------------------------------------------

const EFFECT_TYPE_EFFECTS: &[(&str, EffectFn)] = &[("hybrid_specialist", hybrid_specialist)];

fn hybrid_specialist(_tier: u8) -> EffectOutcome {
    // All attacks become hybrid; both halves roll at a penalty.
    EffectOutcome {
        deltas: vec![
            StatDelta::new(StatKind::Damage, -1.0, "Hybrid Specialist"),
            StatDelta::new(StatKind::Conditions, -1.0, "Hybrid Specialist"),
        ],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Unique-ability archetypes
// ---------------------------------------------------------------------------

const UNIQUE_ABILITY_EFFECTS: &[(&str, EffectFn)] = &[
    ("cut_above", cut_above),
    ("versatile_master", versatile_master),
];

/// Tier-banded flat bonus to ten stats at once: +1 through tier 3, +2 at
/// tier 4, +3 at tier 5.
fn cut_above(tier: u8) -> EffectOutcome {
    let bonus = match tier {
        0..=3 => 1.0,
        4 => 2.0,
        _ => 3.0,
    };
    let stats = [
        StatKind::Accuracy,
        StatKind::Damage,
        StatKind::Conditions,
        StatKind::Avoidance,
        StatKind::Durability,
        StatKind::Resolve,
        StatKind::Stability,
        StatKind::Vitality,
        StatKind::Movement,
        StatKind::Initiative,
    ];
    EffectOutcome {
        deltas: stats
            .into_iter()
            .map(|stat| StatDelta::new(stat, bonus, "Cut Above"))
            .collect(),
        ..Default::default()
    }
}

fn versatile_master(_tier: u8) -> EffectOutcome {
    EffectOutcome {
        actions_per_turn: Some(2),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Defensive archetypes
// ---------------------------------------------------------------------------

const DEFENSIVE_EFFECTS: &[(&str, EffectFn)] = &[
    ("resilient", resilient),
    ("fortress", fortress),
    ("immutable", immutable),
    ("juggernaut", juggernaut),
];

fn resilient(tier: u8) -> EffectOutcome {
    EffectOutcome {
        deltas: vec![StatDelta::new(
            StatKind::Durability,
            f64::from(tier),
            "Resilient",
        )],
        ..Default::default()
    }
}

fn fortress(tier: u8) -> EffectOutcome {
    let bonus = f64::from(tier);
    EffectOutcome {
        deltas: vec![
            StatDelta::new(StatKind::Resolve, bonus, "Fortress"),
            StatDelta::new(StatKind::Stability, bonus, "Fortress"),
            StatDelta::new(StatKind::Vitality, bonus, "Fortress"),
        ],
        ..Default::default()
    }
}

fn immutable(_tier: u8) -> EffectOutcome {
    EffectOutcome {
        immunities: vec!["environmental_conditions"],
        ..Default::default()
    }
}

fn juggernaut(tier: u8) -> EffectOutcome {
    EffectOutcome {
        deltas: vec![StatDelta::new(
            StatKind::Hp,
            5.0 * f64::from(tier),
            "Juggernaut",
        )],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Boons
// ---------------------------------------------------------------------------

const BOON_EFFECTS: &[(&str, EffectFn)] = &[
    ("combat_reflexes", combat_reflexes),
    ("robust", robust),
    ("lightning_reflexes", lightning_reflexes),
    ("danger_sense", danger_sense),
    ("psychic_redirect", psychic_redirect),
    ("elemental_attunement", elemental_attunement),
];

fn combat_reflexes(_tier: u8) -> EffectOutcome {
    EffectOutcome {
        deltas: vec![StatDelta::new(StatKind::Reactions, 1.0, "Combat Reflexes")],
        ..Default::default()
    }
}

fn robust(_tier: u8) -> EffectOutcome {
    EffectOutcome {
        deltas: vec![StatDelta::new(StatKind::Hp, 20.0, "Robust")],
        ..Default::default()
    }
}

fn lightning_reflexes(tier: u8) -> EffectOutcome {
    EffectOutcome {
        deltas: vec![StatDelta::new(
            StatKind::Initiative,
            f64::from(tier),
            "Lightning Reflexes",
        )],
        ..Default::default()
    }
}

fn danger_sense(_tier: u8) -> EffectOutcome {
    EffectOutcome {
        deltas: vec![StatDelta::new(StatKind::Avoidance, 1.0, "Danger Sense")],
        ..Default::default()
    }
}

fn psychic_redirect(_tier: u8) -> EffectOutcome {
    EffectOutcome {
        condition_target: Some(DefenseKind::Resolve),
        ..Default::default()
    }
}

fn elemental_attunement(_tier: u8) -> EffectOutcome {
    EffectOutcome {
        immunities: vec!["fire"],
        vulnerabilities: vec!["cold"],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Flaw penalties (final stage)
// ---------------------------------------------------------------------------

const FLAW_PENALTIES: &[(&str, FlawPenaltyFn)] = &[
    ("sickly", sickly),
    ("unresponsive", unresponsive),
    ("slow", slow),
];

fn sickly(_tier: u8, _current: &StatLine) -> Vec<StatDelta> {
    vec![StatDelta::new(StatKind::Hp, -30.0, "Flaw: Sickly")]
}

fn unresponsive(tier: u8, current: &StatLine) -> Vec<StatDelta> {
    vec![
        // Zeroes reactions outright regardless of how many were granted.
        StatDelta::new(
            StatKind::Reactions,
            -current.get(StatKind::Reactions),
            "Flaw: Unresponsive",
        ),
        StatDelta::new(StatKind::Initiative, -f64::from(tier), "Flaw: Unresponsive"),
    ]
}

fn slow(tier: u8, _current: &StatLine) -> Vec<StatDelta> {
    vec![StatDelta::new(
        StatKind::Movement,
        -f64::from(tier),
        "Flaw: Slow",
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ids_are_noops() {
        let outcome = archetype_effect(ArchetypeCategory::Movement, "rocket_boots", 4);
        assert_eq!(outcome, EffectOutcome::default());
        assert_eq!(boon_effect("wish", 4), EffectOutcome::default());
        assert!(flaw_penalty("cursed", 4, &StatLine::default()).is_empty());
    }

    #[test]
    fn test_cut_above_tier_bands() {
        assert_eq!(cut_above(3).deltas[0].amount, 1.0);
        assert_eq!(cut_above(4).deltas[0].amount, 2.0);
        assert_eq!(cut_above(5).deltas[0].amount, 3.0);
        assert_eq!(cut_above(4).deltas.len(), 10);
    }

    #[test]
    fn test_swift_rounds_up() {
        let outcome = archetype_effect(ArchetypeCategory::Movement, "swift", 3);
        assert_eq!(outcome.deltas[0].amount, 2.0);
    }

    #[test]
    fn test_elemental_attunement_pairs_immunity_with_vulnerability() {
        let outcome = boon_effect("elemental_attunement", 4);
        assert_eq!(outcome.immunities, vec!["fire"]);
        assert_eq!(outcome.vulnerabilities, vec!["cold"]);
    }

    #[test]
    fn test_unresponsive_zeroes_reactions() {
        let mut line = StatLine::default();
        line.set(StatKind::Reactions, 3.0);
        let deltas = flaw_penalty("unresponsive", 4, &line);
        assert_eq!(deltas[0].amount, -3.0);
        assert_eq!(deltas[1].amount, -4.0);
    }
}
