//! # Point Pool Calculator
//!
//! The budget engine: five independent point pools, each an
//! available/spent/remaining triad.
//!
//! Overspending is deliberately allowed everywhere — the system prioritizes
//! narrative flexibility over hard enforcement, so
//! [`PointPoolCalculator::validate_point_spending`] reports overruns as
//! strings for display and nothing in the engine blocks a purchase.

use super::cache::{digest_of, SnapshotCache};
use crate::character::{
    ArchetypeSelections, Attributes, Character, CharacterId, MainPoolPurchases, SpecialAttack,
    UtilityPurchases,
};
use crate::constants::DEFAULT_FLAW_COST;
use crate::engine::tier::{self, LimitScaling};
use crate::VitalityResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Which flaw economy is in play.
///
/// The current (simplified) edition prices flaws like any other purchase and
/// pays them back in stat bonuses; the legacy edition instead granted main
/// pool points for taking them. Both are supported behind this one strategy
/// parameter rather than two purchase systems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesetEdition {
    #[default]
    Simplified,
    Legacy,
}

/// An available/spent pair for one pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolBalance {
    pub available: i32,
    pub spent: i32,
}

impl PoolBalance {
    pub fn new(available: i32, spent: i32) -> Self {
        Self { available, spent }
    }

    /// Remaining points; negative when overspent.
    pub fn remaining(&self) -> i32 {
        self.available - self.spent
    }
}

/// How an attack's upgrade pool was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolMethod {
    /// Limit points scaled through the tier buckets
    LimitScaling,
    /// Flat archetype-only pool, limits ignored
    Fixed,
    /// No recognized special-attack archetype
    None,
}

/// The upgrade-point pool of one special attack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackPool {
    pub attack_id: Uuid,
    pub name: String,
    pub method: PoolMethod,
    pub available: i32,
    pub spent: i32,
    /// Present only for limit-scaling archetypes
    pub scaling: Option<LimitScaling>,
}

impl AttackPool {
    pub fn remaining(&self) -> i32 {
        self.available - self.spent
    }
}

/// All five pools plus aggregate totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointPools {
    pub combat_attributes: PoolBalance,
    pub utility_attributes: PoolBalance,
    pub main_pool: PoolBalance,
    pub utility_pool: PoolBalance,
    pub special_attacks: Vec<AttackPool>,
    pub special_attack_totals: PoolBalance,
    /// Main pool points granted by flaws (legacy edition only; 0 in the
    /// simplified edition where flaws cost points instead)
    pub flaw_bonuses: i32,
    pub total_available: i32,
    pub total_spent: i32,
}

impl PointPools {
    pub fn total_remaining(&self) -> i32 {
        self.total_available - self.total_spent
    }
}

/// Warn-only budget validation outcome. Errors are display strings; the
/// engine never blocks a purchase over them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpendingValidation {
    pub errors: Vec<String>,
}

impl SpendingValidation {
    pub fn is_within_budget(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Resolves the upgrade-point pool for one attack from the special-attack
/// archetype: the four limit-scaling archetypes delegate to
/// [`tier::limit_scaling`]; paragon, one-trick, dual-natured and basic are
/// flat archetype-only pools that ignore limits entirely.
pub fn attack_points_available(
    tier_value: u8,
    archetype: Option<&str>,
    limit_points: f64,
) -> (PoolMethod, i32, Option<LimitScaling>) {
    let t = i32::from(tier_value);
    match archetype {
        Some("normal") | Some("specialist") | Some("straightforward") | Some("shared_uses") => {
            let scaling = tier::limit_scaling(limit_points, tier_value, archetype);
            (PoolMethod::LimitScaling, scaling.final_points, Some(scaling))
        }
        Some("paragon") | Some("basic") => (PoolMethod::Fixed, t * 10, None),
        Some("one_trick") => (PoolMethod::Fixed, t * 20, None),
        Some("dual_natured") => (PoolMethod::Fixed, t * 15, None),
        _ => (PoolMethod::None, 0, None),
    }
}

fn attack_pool(attack: &SpecialAttack, tier_value: u8, archetype: Option<&str>) -> AttackPool {
    let (method, available, scaling) =
        attack_points_available(tier_value, archetype, attack.limit_points());
    AttackPool {
        attack_id: attack.id,
        name: attack.name.clone(),
        method,
        available,
        spent: attack.upgrade_spend(),
        scaling,
    }
}

/// Fields of the character record the pool calculation reads.
#[derive(Serialize)]
struct PoolProjection<'a> {
    tier: u8,
    level: u8,
    edition: RulesetEdition,
    archetypes: &'a ArchetypeSelections,
    attributes: &'a Attributes,
    main_pool_purchases: &'a MainPoolPurchases,
    special_attacks: Vec<(f64, i32)>,
    utility_purchases: &'a UtilityPurchases,
}

/// Computes the five point pools, memoizing per character id like
/// [`crate::StatCalculator`].
#[derive(Debug, Default)]
pub struct PointPoolCalculator {
    edition: RulesetEdition,
    cache: SnapshotCache<PointPools>,
}

impl PointPoolCalculator {
    /// Calculator for the current simplified edition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator for a specific flaw economy.
    pub fn with_edition(edition: RulesetEdition) -> Self {
        Self {
            edition,
            cache: SnapshotCache::new(),
        }
    }

    pub fn edition(&self) -> RulesetEdition {
        self.edition
    }

    /// Computes every pool for the character.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VitalityError::InvalidTier`] when the character's
    /// tier is outside 2..=5; there is no pool layout to degrade to.
    pub fn calculate_all_pools(
        &mut self,
        character: &Character,
    ) -> VitalityResult<Arc<PointPools>> {
        let digest = digest_of(&PoolProjection {
            tier: character.tier,
            level: character.level,
            edition: self.edition,
            archetypes: &character.archetypes,
            attributes: &character.attributes,
            main_pool_purchases: &character.main_pool_purchases,
            special_attacks: character
                .special_attacks
                .iter()
                .map(|a| (a.limit_points(), a.upgrade_spend()))
                .collect(),
            utility_purchases: &character.utility_purchases,
        })?;

        if let Some(cached) = self.cache.get(character.id, &digest) {
            log::debug!("pool cache hit for character {}", character.id);
            return Ok(cached);
        }

        log::debug!("recomputing pools for character {}", character.id);
        let pools = compute_pools(character, self.edition)?;
        Ok(self.cache.put(character.id, digest, pools))
    }

    /// Reports every pool with negative remaining points as an error
    /// string. Warn-only by design.
    pub fn validate_point_spending(
        &mut self,
        character: &Character,
    ) -> VitalityResult<SpendingValidation> {
        let pools = self.calculate_all_pools(character)?;
        let mut errors = Vec::new();

        let named = [
            ("Combat attributes", pools.combat_attributes),
            ("Utility attributes", pools.utility_attributes),
            ("Main pool", pools.main_pool),
            ("Utility pool", pools.utility_pool),
        ];
        for (name, balance) in named {
            if balance.remaining() < 0 {
                errors.push(format!(
                    "{} overspent by {} (spent {} of {})",
                    name,
                    -balance.remaining(),
                    balance.spent,
                    balance.available
                ));
            }
        }
        for attack in &pools.special_attacks {
            if attack.remaining() < 0 {
                errors.push(format!(
                    "Special attack '{}' overspent by {} upgrade points (spent {} of {})",
                    attack.name,
                    -attack.remaining(),
                    attack.spent,
                    attack.available
                ));
            }
        }

        Ok(SpendingValidation { errors })
    }

    /// Drops the cached pools for one character.
    pub fn invalidate(&mut self, id: CharacterId) {
        self.cache.invalidate(id);
    }

    /// Drops every cached result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// Pool computation as a pure function.
pub fn compute_pools(
    character: &Character,
    edition: RulesetEdition,
) -> VitalityResult<PointPools> {
    let tier_pools = tier::pools_for_tier(character.tier)?;
    let purchases = &character.main_pool_purchases;

    let combat_attributes = PoolBalance::new(
        tier_pools.combat_attributes,
        character.attributes.combat_total() as i32,
    );
    let utility_attributes = PoolBalance::new(
        tier_pools.utility_attributes,
        character.attributes.utility_total() as i32,
    );

    let flaw_bonuses = match edition {
        RulesetEdition::Simplified => 0,
        RulesetEdition::Legacy => purchases.flaws.len() as i32 * DEFAULT_FLAW_COST,
    };
    let main_available = match edition {
        RulesetEdition::Simplified => i32::from(character.level),
        RulesetEdition::Legacy => tier_pools.main_pool_legacy + flaw_bonuses,
    };
    let mut main_spent =
        purchases.boon_cost() + purchases.trait_cost() + purchases.conditional_cost();
    if edition == RulesetEdition::Simplified {
        main_spent += purchases.flaw_cost();
    }
    let main_pool = PoolBalance::new(main_available, main_spent);

    let utility_pool = PoolBalance::new(
        tier_pools.utility_pool,
        character.utility_purchases.total_cost(),
    );

    let archetype = character
        .archetypes
        .get(crate::character::ArchetypeCategory::SpecialAttack);
    let special_attacks: Vec<AttackPool> = character
        .special_attacks
        .iter()
        .map(|attack| attack_pool(attack, character.tier, archetype))
        .collect();
    let special_attack_totals = PoolBalance::new(
        special_attacks.iter().map(|a| a.available).sum(),
        special_attacks.iter().map(|a| a.spent).sum(),
    );

    let total_available = combat_attributes.available
        + utility_attributes.available
        + main_pool.available
        + utility_pool.available
        + special_attack_totals.available;
    let total_spent = combat_attributes.spent
        + utility_attributes.spent
        + main_pool.spent
        + utility_pool.spent
        + special_attack_totals.spent;

    Ok(PointPools {
        combat_attributes,
        utility_attributes,
        main_pool,
        utility_pool,
        special_attacks,
        special_attack_totals,
        flaw_bonuses,
        total_available,
        total_spent,
    })
}
