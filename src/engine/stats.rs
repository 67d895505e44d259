//! # Stat Calculator
//!
//! Derives every combat, defense and utility stat from a character record.
//!
//! The calculation is a pipeline of snapshot stages, each taking the
//! previous stage's stat line and returning a new one (never mutating in
//! place):
//!
//! 1. **Base** — linear formulas over tier and attributes
//! 2. **Archetypes** — effect registry per selected archetype
//! 3. **Boons** — effect registry per purchased boon
//! 4. **Traits/Flaws** — stacked stat bonuses with a diminishing-returns
//!    penalty for redundant sources
//! 5. **Final** — flaw penalties, then floor clamps
//!
//! Every numeric contribution is also recorded in the breakdown trail at
//! the moment it is applied, so for each stat the breakdown entries always
//! sum to the final value.

use super::cache::{digest_of, SnapshotCache};
use super::effects::{self, EffectOutcome, StatDelta};
use crate::character::{
    ArchetypeCategory, ArchetypeSelections, Attributes, Character, CharacterId, DefenseKind,
    MainPoolPurchases, StatKind, UtilityPurchases,
};
use crate::engine::tier;
use crate::VitalityResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

const EPS: f64 = 1e-9;

/// Stats recomputed by the narrow combat path.
pub const COMBAT_STATS: &[StatKind] = &[
    StatKind::Accuracy,
    StatKind::Damage,
    StatKind::Conditions,
    StatKind::Initiative,
];

/// Stats recomputed by the narrow defense path.
pub const DEFENSE_STATS: &[StatKind] = &[
    StatKind::Avoidance,
    StatKind::Durability,
    StatKind::Resolve,
    StatKind::Stability,
    StatKind::Vitality,
    StatKind::Hp,
    StatKind::Reactions,
];

/// Stats recomputed by the narrow utility path.
pub const UTILITY_STATS: &[StatKind] = &[StatKind::Movement];

/// One snapshot of every derived stat, plus the non-numeric grants that
/// ride along with the pipeline (immunities, action count, condition
/// targeting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub accuracy: f64,
    pub damage: f64,
    pub conditions: f64,
    pub avoidance: f64,
    pub durability: f64,
    pub resolve: f64,
    pub stability: f64,
    pub vitality: f64,
    pub hp: f64,
    pub movement: f64,
    pub initiative: f64,
    pub reactions: f64,
    pub immunities: BTreeSet<String>,
    pub vulnerabilities: BTreeSet<String>,
    pub actions_per_turn: u8,
    pub condition_target: DefenseKind,
}

impl Default for StatLine {
    fn default() -> Self {
        Self {
            accuracy: 0.0,
            damage: 0.0,
            conditions: 0.0,
            avoidance: 0.0,
            durability: 0.0,
            resolve: 0.0,
            stability: 0.0,
            vitality: 0.0,
            hp: 0.0,
            movement: 0.0,
            initiative: 0.0,
            reactions: 0.0,
            immunities: BTreeSet::new(),
            vulnerabilities: BTreeSet::new(),
            actions_per_turn: 1,
            condition_target: DefenseKind::default(),
        }
    }
}

impl StatLine {
    /// Base stats from tier and attributes.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitality::{Character, StatLine, StatKind};
    ///
    /// let mut character = Character::new("Hero", 3); // tier 4
    /// character.attributes.focus = 2;
    /// character.attributes.power = 2;
    /// let base = StatLine::base(&character);
    /// assert_eq!(base.get(StatKind::Accuracy), 6.0); // tier + focus
    /// assert_eq!(base.get(StatKind::Damage), 7.0); // tier + power * 1.5
    /// assert_eq!(base.get(StatKind::Hp), 100.0); // flat
    /// ```
    pub fn base(character: &Character) -> Self {
        let t = f64::from(character.tier);
        let a = &character.attributes;
        Self {
            accuracy: t + f64::from(a.focus),
            damage: t + f64::from(a.power) * 1.5,
            conditions: t * 2.0,
            avoidance: crate::constants::BASE_AVOIDANCE + t + f64::from(a.mobility),
            durability: t + f64::from(a.endurance) * 1.5,
            resolve: crate::constants::BASE_SECONDARY_DEFENSE + t + f64::from(a.focus),
            stability: crate::constants::BASE_SECONDARY_DEFENSE + t + f64::from(a.power),
            vitality: crate::constants::BASE_SECONDARY_DEFENSE + t + f64::from(a.endurance),
            hp: tier::base_hp(),
            movement: tier::base_movement(a.mobility, character.tier),
            initiative: t + f64::from(a.mobility) + f64::from(a.awareness),
            reactions: 1.0,
            ..Default::default()
        }
    }

    /// Reads a stat by kind.
    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Accuracy => self.accuracy,
            StatKind::Damage => self.damage,
            StatKind::Conditions => self.conditions,
            StatKind::Avoidance => self.avoidance,
            StatKind::Durability => self.durability,
            StatKind::Resolve => self.resolve,
            StatKind::Stability => self.stability,
            StatKind::Vitality => self.vitality,
            StatKind::Hp => self.hp,
            StatKind::Movement => self.movement,
            StatKind::Initiative => self.initiative,
            StatKind::Reactions => self.reactions,
        }
    }

    /// Writes a stat by kind.
    pub fn set(&mut self, stat: StatKind, value: f64) {
        match stat {
            StatKind::Accuracy => self.accuracy = value,
            StatKind::Damage => self.damage = value,
            StatKind::Conditions => self.conditions = value,
            StatKind::Avoidance => self.avoidance = value,
            StatKind::Durability => self.durability = value,
            StatKind::Resolve => self.resolve = value,
            StatKind::Stability => self.stability = value,
            StatKind::Vitality => self.vitality = value,
            StatKind::Hp => self.hp = value,
            StatKind::Movement => self.movement = value,
            StatKind::Initiative => self.initiative = value,
            StatKind::Reactions => self.reactions = value,
        }
    }

    fn add(&mut self, stat: StatKind, amount: f64) {
        self.set(stat, self.get(stat) + amount);
    }
}

/// One line of the per-stat breakdown trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub source: String,
    pub value: f64,
}

/// Layered stat snapshots plus the breakdown trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatedStats {
    pub base: StatLine,
    pub with_archetypes: StatLine,
    pub with_boons: StatLine,
    pub with_traits_flaws: StatLine,
    #[serde(rename = "final")]
    pub final_stats: StatLine,
    /// Ordered contributions per stat; entries sum to the final value
    pub breakdown: BTreeMap<StatKind, Vec<BreakdownEntry>>,
}

impl CalculatedStats {
    /// Sum of the breakdown entries for one stat. Always equals
    /// `final_stats.get(stat)` up to floating-point noise.
    pub fn breakdown_total(&self, stat: StatKind) -> f64 {
        self.breakdown
            .get(&stat)
            .map(|entries| entries.iter().map(|e| e.value).sum())
            .unwrap_or(0.0)
    }
}

/// Fields of the character record the stat calculation reads; the cache
/// digest is taken over exactly this projection.
#[derive(Serialize)]
struct StatProjection<'a> {
    tier: u8,
    archetypes: &'a ArchetypeSelections,
    attributes: &'a Attributes,
    main_pool_purchases: &'a MainPoolPurchases,
    utility_purchases: &'a UtilityPurchases,
}

/// Derives layered stat snapshots from a character, memoizing per character
/// id on a structural hash of the fields it reads.
#[derive(Debug, Default)]
pub struct StatCalculator {
    cache: SnapshotCache<CalculatedStats>,
}

impl StatCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the full pipeline, returning a cached result (pointer-identical
    /// `Arc`) when the relevant character fields are unchanged.
    pub fn calculate_all_stats(
        &mut self,
        character: &Character,
    ) -> VitalityResult<Arc<CalculatedStats>> {
        let digest = digest_of(&StatProjection {
            tier: character.tier,
            archetypes: &character.archetypes,
            attributes: &character.attributes,
            main_pool_purchases: &character.main_pool_purchases,
            utility_purchases: &character.utility_purchases,
        })?;

        if let Some(cached) = self.cache.get(character.id, &digest) {
            log::debug!("stat cache hit for character {}", character.id);
            return Ok(cached);
        }

        log::debug!("recomputing stats for character {}", character.id);
        let computed = compute_all(character);
        Ok(self.cache.put(character.id, digest, computed))
    }

    /// Drops the cached result for one character. Call when discarding or
    /// reloading a character record that keeps its id.
    pub fn invalidate(&mut self, id: CharacterId) {
        self.cache.invalidate(id);
    }

    /// Drops every cached result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// The full five-stage pipeline as a pure function.
pub fn compute_all(character: &Character) -> CalculatedStats {
    let tier = character.tier;
    let mut breakdown: BTreeMap<StatKind, Vec<BreakdownEntry>> = BTreeMap::new();

    let base = StatLine::base(character);
    for stat in StatKind::ALL {
        breakdown.entry(stat).or_default().push(BreakdownEntry {
            source: "Base".to_string(),
            value: base.get(stat),
        });
    }

    let mut with_archetypes = base.clone();
    for category in ArchetypeCategory::ALL {
        if let Some(id) = character.archetypes.get(category) {
            let outcome = effects::archetype_effect(category, id, tier);
            apply_outcome(&mut with_archetypes, &outcome, &mut breakdown);
        }
    }

    let mut with_boons = with_archetypes.clone();
    for boon in &character.main_pool_purchases.boons {
        let outcome = effects::boon_effect(&boon.boon_id, tier);
        apply_outcome(&mut with_boons, &outcome, &mut breakdown);
    }

    let mut with_traits_flaws = with_boons.clone();
    for delta in stacking_deltas(character) {
        apply_delta(&mut with_traits_flaws, &delta, &mut breakdown);
    }

    let mut final_stats = with_traits_flaws.clone();
    for flaw in &character.main_pool_purchases.flaws {
        for delta in effects::flaw_penalty(&flaw.flaw_id, tier, &final_stats) {
            apply_delta(&mut final_stats, &delta, &mut breakdown);
        }
    }
    clamp_floor(&mut final_stats, StatKind::Hp, 1.0, &mut breakdown);
    clamp_floor(&mut final_stats, StatKind::Reactions, 0.0, &mut breakdown);
    clamp_floor(&mut final_stats, StatKind::Avoidance, 0.0, &mut breakdown);

    for entries in breakdown.values_mut() {
        entries.retain(|entry| entry.value.abs() > EPS);
    }
    breakdown.retain(|_, entries| !entries.is_empty());

    CalculatedStats {
        base,
        with_archetypes,
        with_boons,
        with_traits_flaws,
        final_stats,
        breakdown,
    }
}

/// Narrow path: only the combat stats, skipping everything that cannot
/// touch them.
pub fn combat_stats(character: &Character) -> BTreeMap<StatKind, f64> {
    compute_subset(character, COMBAT_STATS)
}

/// Narrow path: only the defense stats.
pub fn defense_stats(character: &Character) -> BTreeMap<StatKind, f64> {
    compute_subset(character, DEFENSE_STATS)
}

/// Narrow path: only the utility stats.
pub fn utility_stats(character: &Character) -> BTreeMap<StatKind, f64> {
    compute_subset(character, UTILITY_STATS)
}

/// Stacked trait/flaw/conditional stat bonuses.
///
/// Contributions are collected per stat in purchase order; the Nth
/// (0-indexed) contribution to the *same* stat is worth `max(1, tier - N)`,
/// so redundant bonus sources diminish but never drop below 1.
fn stacking_deltas(character: &Character) -> Vec<StatDelta> {
    let tier = f64::from(character.tier);
    let mut counts: BTreeMap<StatKind, u32> = BTreeMap::new();
    let mut deltas = Vec::new();

    let mut push = |stat: StatKind, source: String| {
        let n = counts.entry(stat).or_insert(0);
        let value = (tier - f64::from(*n)).max(1.0);
        *n += 1;
        deltas.push(StatDelta {
            stat,
            amount: value,
            source,
        });
    };

    for purchase in &character.main_pool_purchases.traits {
        for &stat in &purchase.stat_bonuses {
            push(stat, format!("Trait: {}", purchase.name));
        }
    }
    for purchase in &character.main_pool_purchases.conditional_bonuses {
        for &stat in &purchase.stat_bonuses {
            push(stat, format!("Conditional: {}", purchase.conditional_bonus_id));
        }
    }
    for purchase in &character.main_pool_purchases.flaws {
        push(purchase.stat_bonus, format!("Flaw: {}", purchase.name));
    }

    deltas
}

fn apply_outcome(
    line: &mut StatLine,
    outcome: &EffectOutcome,
    breakdown: &mut BTreeMap<StatKind, Vec<BreakdownEntry>>,
) {
    for delta in &outcome.deltas {
        apply_delta(line, delta, breakdown);
    }
    line.immunities
        .extend(outcome.immunities.iter().map(|s| s.to_string()));
    line.vulnerabilities
        .extend(outcome.vulnerabilities.iter().map(|s| s.to_string()));
    if let Some(actions) = outcome.actions_per_turn {
        line.actions_per_turn = actions;
    }
    if let Some(target) = outcome.condition_target {
        line.condition_target = target;
    }
}

fn apply_delta(
    line: &mut StatLine,
    delta: &StatDelta,
    breakdown: &mut BTreeMap<StatKind, Vec<BreakdownEntry>>,
) {
    line.add(delta.stat, delta.amount);
    breakdown.entry(delta.stat).or_default().push(BreakdownEntry {
        source: delta.source.clone(),
        value: delta.amount,
    });
}

fn clamp_floor(
    line: &mut StatLine,
    stat: StatKind,
    floor: f64,
    breakdown: &mut BTreeMap<StatKind, Vec<BreakdownEntry>>,
) {
    let value = line.get(stat);
    if value < floor {
        let adjustment = floor - value;
        line.set(stat, floor);
        breakdown.entry(stat).or_default().push(BreakdownEntry {
            source: format!("{} minimum", stat.label()),
            value: adjustment,
        });
    }
}

/// Runs the pipeline for a subset of stats, applying only the deltas that
/// touch them. Shared by the narrow category paths.
fn compute_subset(character: &Character, stats: &[StatKind]) -> BTreeMap<StatKind, f64> {
    let tier = character.tier;
    let wanted: BTreeSet<StatKind> = stats.iter().copied().collect();

    let base = StatLine::base(character);
    let mut line = StatLine::default();
    for &stat in stats {
        line.set(stat, base.get(stat));
    }

    let mut apply_filtered = |line: &mut StatLine, deltas: &[StatDelta]| {
        for delta in deltas {
            if wanted.contains(&delta.stat) {
                line.add(delta.stat, delta.amount);
            }
        }
    };

    for category in ArchetypeCategory::ALL {
        if let Some(id) = character.archetypes.get(category) {
            apply_filtered(
                &mut line,
                &effects::archetype_effect(category, id, tier).deltas,
            );
        }
    }
    for boon in &character.main_pool_purchases.boons {
        apply_filtered(&mut line, &effects::boon_effect(&boon.boon_id, tier).deltas);
    }
    apply_filtered(&mut line, &stacking_deltas(character));
    for flaw in &character.main_pool_purchases.flaws {
        let penalties = effects::flaw_penalty(&flaw.flaw_id, tier, &line);
        apply_filtered(&mut line, &penalties);
    }

    for (stat, floor) in [
        (StatKind::Hp, 1.0),
        (StatKind::Reactions, 0.0),
        (StatKind::Avoidance, 0.0),
    ] {
        if wanted.contains(&stat) && line.get(stat) < floor {
            line.set(stat, floor);
        }
    }

    stats.iter().map(|&stat| (stat, line.get(stat))).collect()
}
