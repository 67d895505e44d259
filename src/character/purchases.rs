//! # Purchases
//!
//! Purchase records for the main pool (boons, traits, flaws, conditional
//! bonuses) and the utility pool (features, senses, movement options,
//! descriptors). Each purchase is an independent record; none references
//! another.

use super::StatKind;
use crate::constants::DEFAULT_FLAW_COST;
use serde::{Deserialize, Serialize};

/// A purchased boon: a flat-cost ability keyed into the boon effect
/// registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoonPurchase {
    pub boon_id: String,
    pub cost: i32,
}

impl BoonPurchase {
    pub fn new(boon_id: impl Into<String>, cost: i32) -> Self {
        Self {
            boon_id: boon_id.into(),
            cost,
        }
    }
}

/// A purchased trait: named by the player, contributing tier-scaled bonuses
/// to one or more stats (subject to the stacking penalty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitPurchase {
    pub name: String,
    pub cost: i32,
    pub stat_bonuses: Vec<StatKind>,
}

impl TraitPurchase {
    pub fn new(name: impl Into<String>, cost: i32, stat_bonuses: Vec<StatKind>) -> Self {
        Self {
            name: name.into(),
            cost,
            stat_bonuses,
        }
    }
}

/// A purchased flaw.
///
/// In the current edition flaws cost points and grant a stat bonus plus a
/// narrative drawback; the legacy edition instead granted points for taking
/// them (see [`crate::RulesetEdition`]). The `flaw_id` keys the final-stage
/// penalty registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlawPurchase {
    pub flaw_id: String,
    pub name: String,
    #[serde(default = "default_flaw_cost")]
    pub cost: i32,
    pub stat_bonus: StatKind,
}

impl FlawPurchase {
    pub fn new(flaw_id: impl Into<String>, name: impl Into<String>, stat_bonus: StatKind) -> Self {
        Self {
            flaw_id: flaw_id.into(),
            name: name.into(),
            cost: DEFAULT_FLAW_COST,
            stat_bonus,
        }
    }
}

fn default_flaw_cost() -> i32 {
    DEFAULT_FLAW_COST
}

/// A purchased conditional bonus: two stat bonuses that apply while a
/// narrative condition holds. The engine treats them as always-on
/// contributors for budgeting and stacking purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalBonusPurchase {
    pub conditional_bonus_id: String,
    pub stat_bonuses: Vec<StatKind>,
    pub cost: i32,
}

/// Everything paid from the main pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainPoolPurchases {
    pub boons: Vec<BoonPurchase>,
    pub traits: Vec<TraitPurchase>,
    pub flaws: Vec<FlawPurchase>,
    pub conditional_bonuses: Vec<ConditionalBonusPurchase>,
}

impl MainPoolPurchases {
    /// True when nothing has been purchased.
    pub fn is_empty(&self) -> bool {
        self.boons.is_empty()
            && self.traits.is_empty()
            && self.flaws.is_empty()
            && self.conditional_bonuses.is_empty()
    }

    /// Sum of boon costs.
    pub fn boon_cost(&self) -> i32 {
        self.boons.iter().map(|b| b.cost).sum()
    }

    /// Sum of trait costs.
    pub fn trait_cost(&self) -> i32 {
        self.traits.iter().map(|t| t.cost).sum()
    }

    /// Sum of flaw costs.
    pub fn flaw_cost(&self) -> i32 {
        self.flaws.iter().map(|f| f.cost).sum()
    }

    /// Sum of conditional bonus costs.
    pub fn conditional_cost(&self) -> i32 {
        self.conditional_bonuses.iter().map(|c| c.cost).sum()
    }
}

/// A single utility purchase: feature, sense, movement option or descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityPurchase {
    pub id: String,
    pub name: String,
    pub cost: i32,
}

impl UtilityPurchase {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cost: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
        }
    }
}

/// Everything paid from the utility pool, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityPurchases {
    pub features: Vec<UtilityPurchase>,
    pub senses: Vec<UtilityPurchase>,
    pub movement: Vec<UtilityPurchase>,
    pub descriptors: Vec<UtilityPurchase>,
}

impl UtilityPurchases {
    /// Iterates over every purchase regardless of kind.
    pub fn iter_all(&self) -> impl Iterator<Item = &UtilityPurchase> {
        self.features
            .iter()
            .chain(self.senses.iter())
            .chain(self.movement.iter())
            .chain(self.descriptors.iter())
    }

    /// Sum of all utility purchase costs.
    pub fn total_cost(&self) -> i32 {
        self.iter_all().map(|p| p.cost).sum()
    }
}
