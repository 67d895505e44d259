//! # Character Model
//!
//! The character record and its building blocks: attributes, archetype
//! selections, purchases, and special attacks.
//!
//! A [`Character`] is created with defaults, mutated incrementally by direct
//! field edits as the user builds it, and serialized wholesale to JSON for
//! storage. Derived stats and point pools are never stored on the record;
//! the calculators in [`crate::engine`] recompute them on demand.

pub mod archetypes;
pub mod attacks;
pub mod purchases;

pub use archetypes::{ArchetypeCategory, ArchetypeSelections};
pub use attacks::{Limit, SpecialAttack, Upgrade};
pub use purchases::{
    BoonPurchase, ConditionalBonusPurchase, FlawPurchase, MainPoolPurchases, TraitPurchase,
    UtilityPurchase, UtilityPurchases,
};

use crate::constants::{MAX_TIER, MIN_TIER};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for characters.
pub type CharacterId = Uuid;

/// Creates a new unique character ID.
pub fn new_character_id() -> CharacterId {
    Uuid::new_v4()
}

/// Maps narrative level to power tier.
///
/// Fixed lookup, not a formula: levels 1 and 2 play at tier 3, levels 3 and
/// 4 at tier 4, level 5 at tier 5.
///
/// # Examples
///
/// ```
/// use vitality::tier_for_level;
///
/// assert_eq!(tier_for_level(1), 3);
/// assert_eq!(tier_for_level(4), 4);
/// assert_eq!(tier_for_level(5), 5);
/// ```
pub fn tier_for_level(level: u8) -> u8 {
    match level {
        0..=2 => 3,
        3 | 4 => 4,
        _ => 5,
    }
}

/// Identifies a derived statistic.
///
/// Used by purchase records to name which stat a trait or flaw boosts, and
/// by the stat calculator's breakdown trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Accuracy,
    Damage,
    Conditions,
    Avoidance,
    Durability,
    Resolve,
    Stability,
    Vitality,
    Hp,
    Movement,
    Initiative,
    Reactions,
}

impl StatKind {
    /// All stats, in display order.
    pub const ALL: [StatKind; 12] = [
        StatKind::Accuracy,
        StatKind::Damage,
        StatKind::Conditions,
        StatKind::Avoidance,
        StatKind::Durability,
        StatKind::Resolve,
        StatKind::Stability,
        StatKind::Vitality,
        StatKind::Hp,
        StatKind::Movement,
        StatKind::Initiative,
        StatKind::Reactions,
    ];

    /// Human-readable stat name for summaries and breakdowns.
    pub fn label(self) -> &'static str {
        match self {
            StatKind::Accuracy => "Accuracy",
            StatKind::Damage => "Damage",
            StatKind::Conditions => "Conditions",
            StatKind::Avoidance => "Avoidance",
            StatKind::Durability => "Durability",
            StatKind::Resolve => "Resolve",
            StatKind::Stability => "Stability",
            StatKind::Vitality => "Vitality",
            StatKind::Hp => "HP",
            StatKind::Movement => "Movement",
            StatKind::Initiative => "Initiative",
            StatKind::Reactions => "Reactions",
        }
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which secondary defense a condition effect rolls against.
///
/// Condition effects target stability by default; certain boons reroute
/// them to another defense.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseKind {
    Resolve,
    #[default]
    Stability,
    Vitality,
}

/// The seven character attributes.
///
/// Focus, power, mobility and endurance are combat attributes paid from the
/// combat pool; awareness, communication and intelligence are utility
/// attributes paid from the utility attribute pool. Each is individually
/// capped at the character's tier (soft constraint, surfaced by
/// [`Character::validate`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub focus: u8,
    pub power: u8,
    pub mobility: u8,
    pub endurance: u8,
    pub awareness: u8,
    pub communication: u8,
    pub intelligence: u8,
}

impl Attributes {
    /// Total points allocated to combat attributes.
    pub fn combat_total(&self) -> u32 {
        u32::from(self.focus) + u32::from(self.power) + u32::from(self.mobility)
            + u32::from(self.endurance)
    }

    /// Total points allocated to utility attributes.
    pub fn utility_total(&self) -> u32 {
        u32::from(self.awareness) + u32::from(self.communication) + u32::from(self.intelligence)
    }

    /// The attribute capped above the tier limit, if any.
    fn over_cap(&self, tier: u8) -> Vec<(&'static str, u8)> {
        let mut over = Vec::new();
        for (name, value) in [
            ("focus", self.focus),
            ("power", self.power),
            ("mobility", self.mobility),
            ("endurance", self.endurance),
            ("awareness", self.awareness),
            ("communication", self.communication),
            ("intelligence", self.intelligence),
        ] {
            if value > tier {
                over.push((name, value));
            }
        }
        over
    }
}

/// A Vitality System character under construction.
///
/// The only entity in the system. Mutations are direct field edits; all
/// derived data (stats, pools) is recomputed from the record by the engine
/// calculators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Stable identity, used to key calculator caches
    pub id: CharacterId,
    /// Display name
    pub name: String,
    /// Narrative progression level (1-5)
    pub level: u8,
    /// Power tier derived from level
    pub tier: u8,
    /// The seven attributes
    pub attributes: Attributes,
    /// One nullable archetype selection per category
    pub archetypes: ArchetypeSelections,
    /// Boons, traits, flaws and conditional bonuses paid from the main pool
    pub main_pool_purchases: MainPoolPurchases,
    /// Features, senses, movement options and descriptors
    pub utility_purchases: UtilityPurchases,
    /// Special attacks built from limits and upgrades
    pub special_attacks: Vec<SpecialAttack>,
}

impl Character {
    /// Creates a character at the given level with empty collections.
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        let level = level.clamp(1, crate::constants::MAX_LEVEL);
        Self {
            id: new_character_id(),
            name: name.into(),
            level,
            tier: tier_for_level(level),
            attributes: Attributes::default(),
            archetypes: ArchetypeSelections::default(),
            main_pool_purchases: MainPoolPurchases::default(),
            utility_purchases: UtilityPurchases::default(),
            special_attacks: Vec::new(),
        }
    }

    /// Sets the level and re-derives the tier from the lookup table.
    pub fn set_level(&mut self, level: u8) {
        self.level = level.clamp(1, crate::constants::MAX_LEVEL);
        self.tier = tier_for_level(self.level);
    }

    /// Soft validation: returns warning strings, never blocks.
    ///
    /// The builder deliberately allows over-cap and over-budget characters;
    /// warnings are surfaced for display. Budget overruns per pool are
    /// reported separately by
    /// [`crate::PointPoolCalculator::validate_point_spending`].
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !(MIN_TIER..=MAX_TIER).contains(&self.tier) {
            warnings.push(format!(
                "Tier {} is outside the playable range {}-{}",
                self.tier, MIN_TIER, MAX_TIER
            ));
        }

        for (name, value) in self.attributes.over_cap(self.tier) {
            warnings.push(format!(
                "Attribute {} is {} but the tier cap is {}",
                name, value, self.tier
            ));
        }

        let combat = self.attributes.combat_total();
        let combat_cap = u32::from(self.tier) * 2;
        if combat > combat_cap {
            warnings.push(format!(
                "Combat attributes total {} exceeds the cap of {}",
                combat, combat_cap
            ));
        }

        let utility = self.attributes.utility_total();
        if utility > u32::from(self.tier) {
            warnings.push(format!(
                "Utility attributes total {} exceeds the cap of {}",
                utility, self.tier
            ));
        }

        let boons = self.main_pool_purchases.boons.len();
        if boons > usize::from(self.level) {
            warnings.push(format!(
                "{} boons purchased but level {} allows at most {}",
                boons, self.level, self.level
            ));
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_lookup_table() {
        assert_eq!(tier_for_level(1), 3);
        assert_eq!(tier_for_level(2), 3);
        assert_eq!(tier_for_level(3), 4);
        assert_eq!(tier_for_level(4), 4);
        assert_eq!(tier_for_level(5), 5);
    }

    #[test]
    fn test_new_character_defaults() {
        let character = Character::new("Test", 1);
        assert_eq!(character.tier, 3);
        assert_eq!(character.attributes.combat_total(), 0);
        assert!(character.special_attacks.is_empty());
        assert!(character.validate().is_empty());
    }

    #[test]
    fn test_set_level_rederives_tier() {
        let mut character = Character::new("Test", 1);
        character.set_level(5);
        assert_eq!(character.tier, 5);
        character.set_level(3);
        assert_eq!(character.tier, 4);
    }

    #[test]
    fn test_level_clamped_to_range() {
        let character = Character::new("Test", 40);
        assert_eq!(character.level, 5);
        assert_eq!(character.tier, 5);
    }

    #[test]
    fn test_attribute_cap_warning() {
        let mut character = Character::new("Test", 1);
        character.attributes.power = 5; // tier is 3
        let warnings = character.validate();
        assert!(warnings.iter().any(|w| w.contains("power")));
    }

    #[test]
    fn test_combat_total_cap_warning() {
        let mut character = Character::new("Test", 1);
        character.attributes.focus = 3;
        character.attributes.power = 3;
        character.attributes.mobility = 3;
        let warnings = character.validate();
        assert!(warnings.iter().any(|w| w.contains("Combat attributes")));
    }

    #[test]
    fn test_boon_count_bounded_by_level() {
        let mut character = Character::new("Test", 1);
        for _ in 0..2 {
            character
                .main_pool_purchases
                .boons
                .push(BoonPurchase::new("combat_reflexes", 0));
        }
        let warnings = character.validate();
        assert!(warnings.iter().any(|w| w.contains("boons")));
    }

    #[test]
    fn test_character_id_uniqueness() {
        let a = Character::new("A", 1);
        let b = Character::new("B", 1);
        assert_ne!(a.id, b.id);
    }
}
