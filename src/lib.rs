//! # Vitality Character Engine
//!
//! Calculation engine for Vitality System character creation.
//!
//! ## Architecture Overview
//!
//! The crate is organized around a single mutable [`Character`] record and a
//! set of pure calculators that derive everything else from it:
//!
//! - **Character Model**: the character record, attributes, archetype
//!   selections, purchases and special attacks
//! - **Tier System**: tier lookups and the limit-point scaling algorithm
//!   (diminishing-returns buckets with archetype multipliers)
//! - **Stat Calculator**: layered stat snapshots (base → archetypes → boons →
//!   traits/flaws → final) with a per-stat breakdown trail
//! - **Point Pool Calculator**: the five point budgets (combat attributes,
//!   utility attributes, main pool, utility pool, per-attack pools)
//! - **Dice System**: roll primitives and composite checks with an
//!   injectable RNG
//!
//! Derived data is never stored: callers persist the character record and
//! recompute stats and pools on demand. Both calculators memoize on a
//! structural hash of the relevant character fields, keyed by character id,
//! so repeated calls with an unchanged character are free.

pub mod character;
pub mod combat;
pub mod constants;
pub mod dice;
pub mod engine;
pub mod export;

pub use character::{
    new_character_id, tier_for_level, ArchetypeCategory, ArchetypeSelections, Attributes,
    BoonPurchase, Character, CharacterId, ConditionalBonusPurchase, DefenseKind, FlawPurchase,
    Limit, MainPoolPurchases, SpecialAttack, StatKind, TraitPurchase, Upgrade, UtilityPurchase,
    UtilityPurchases,
};
pub use combat::{resolve_attack, AttackOutcome};
pub use dice::{CheckResult, DiceRoller, SurvivalResult};
pub use engine::pools::{
    AttackPool, PointPoolCalculator, PointPools, PoolBalance, PoolMethod, RulesetEdition,
    SpendingValidation,
};
pub use engine::stats::{BreakdownEntry, CalculatedStats, StatCalculator, StatLine};
pub use engine::tier::{self, LimitScaling};
pub use export::{
    from_json_str, load_from_file, roll20_sheet, save_to_file, to_json_string, Roll20Sheet,
};

/// Core error type for the Vitality character engine.
#[derive(thiserror::Error, Debug)]
pub enum VitalityError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Tier is outside the playable 2..=5 range
    #[error("Invalid tier: {0}")]
    InvalidTier(u8),

    /// Character record is structurally unusable
    #[error("Invalid character: {0}")]
    InvalidCharacter(String),
}

/// Result type used throughout the Vitality codebase.
pub type VitalityResult<T> = Result<T, VitalityError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
