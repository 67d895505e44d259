//! # Game Constants
//!
//! Static formula coefficients shared by the calculators. Values mirror the
//! current edition of the Vitality System rulebook; nothing here is tunable
//! at runtime.

/// Lowest playable tier.
pub const MIN_TIER: u8 = 2;

/// Highest playable tier.
pub const MAX_TIER: u8 = 5;

/// Highest narrative level.
pub const MAX_LEVEL: u8 = 5;

/// Base hit points, flat across all tiers in the current edition.
pub const BASE_HP: f64 = 100.0;

/// Base avoidance before tier and mobility are added.
pub const BASE_AVOIDANCE: f64 = 5.0;

/// Base value shared by the three secondary defenses (resolve, stability,
/// vitality).
pub const BASE_SECONDARY_DEFENSE: f64 = 10.0;

/// Flat movement bonus compared against tier in the base movement formula.
pub const BASE_MOVEMENT_BONUS: u8 = 6;

/// Default point cost of a flaw when a purchase record does not carry one.
pub const DEFAULT_FLAW_COST: i32 = 30;

/// Main pool points granted per tier above 2 in the legacy ruleset.
pub const LEGACY_MAIN_POOL_PER_TIER: i32 = 15;

/// Utility pool points granted per tier above 2.
pub const UTILITY_POOL_PER_TIER: i32 = 5;

/// Limit-point scaling: first bucket ends at `tier * FIRST_BUCKET_TIER_SPAN`.
pub const FIRST_BUCKET_TIER_SPAN: f64 = 10.0;

/// Limit-point scaling: second bucket spans `tier * SECOND_BUCKET_TIER_SPAN`
/// beyond the first.
pub const SECOND_BUCKET_TIER_SPAN: f64 = 20.0;

/// Scaling rate inside the first diminishing-returns bucket.
pub const FIRST_BUCKET_RATE: f64 = 1.0;

/// Scaling rate inside the second diminishing-returns bucket.
pub const SECOND_BUCKET_RATE: f64 = 0.5;

/// Scaling rate beyond both bucket thresholds.
pub const THIRD_BUCKET_RATE: f64 = 0.25;

/// Granularity that scaled upgrade points are rounded up to.
pub const POINT_GRANULARITY: f64 = 10.0;

/// Sides on the check die.
pub const D20_SIDES: u32 = 20;

/// Sides on the damage die.
pub const D6_SIDES: u32 = 6;

/// Damage dice explode (roll again and accumulate) on this face.
pub const EXPLODE_ON: u32 = 6;

/// Number of exploding d6 summed into a damage roll.
pub const DAMAGE_DICE_COUNT: u32 = 3;

/// Failing a survival check by this margin or more is catastrophic.
pub const CATASTROPHIC_MARGIN: i32 = 20;
