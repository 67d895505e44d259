//! # Tier System
//!
//! Tier-driven lookups and the limit-point scaling algorithm.
//!
//! Limit scaling is the single most important formula in the system: it
//! converts the limit points accumulated on a special attack into usable
//! upgrade points. Small investments scale at full value while large
//! single-attack point dumps are pushed through 50% and 25% buckets, and the
//! archetype multiplier is applied *before* the buckets — applying it after
//! would change results for any non-unit multiplier.

use crate::constants::{
    BASE_HP, BASE_MOVEMENT_BONUS, FIRST_BUCKET_RATE, FIRST_BUCKET_TIER_SPAN, MAX_TIER, MIN_TIER,
    POINT_GRANULARITY, SECOND_BUCKET_RATE, SECOND_BUCKET_TIER_SPAN, THIRD_BUCKET_RATE,
};
use crate::{VitalityError, VitalityResult};
use serde::Serialize;

/// Result of scaling an attack's limit points into upgrade points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimitScaling {
    /// Points after the diminishing-returns buckets, before rounding
    pub total_value: f64,
    /// Usable upgrade points: `total_value` rounded up to the nearest 10
    pub final_points: i32,
    /// Limit points after the archetype multiplier
    pub scaled_limit_points: f64,
    /// The multiplier applied for the special-attack archetype
    pub archetype_multiplier: f64,
}

/// Multiplier applied to limit points before the diminishing-returns
/// buckets. Archetypes outside the four limit-scaling ones (including no
/// selection at all) contribute nothing.
pub fn archetype_multiplier(tier: u8, archetype: Option<&str>) -> f64 {
    let tier = f64::from(tier);
    match archetype {
        Some("normal") => tier / 6.0,
        Some("specialist") => tier / 3.0,
        Some("straightforward") => tier / 2.0,
        Some("shared_uses") => 1.0,
        _ => 0.0,
    }
}

/// Scales limit points into upgrade points.
///
/// 1. Multiply by the archetype multiplier.
/// 2. Run the scaled points through three buckets: full value up to
///    `tier * 10`, half value across the next `tier * 20`, quarter value
///    beyond that.
/// 3. Round the total up to the nearest 10.
///
/// # Examples
///
/// ```
/// use vitality::tier::limit_scaling;
///
/// // Tier 4 normal archetype: 60 limit points scale to exactly the first
/// // bucket boundary (40), so nothing is diminished.
/// let scaling = limit_scaling(60.0, 4, Some("normal"));
/// assert_eq!(scaling.final_points, 40);
///
/// // Unselected archetype scales everything to zero.
/// assert_eq!(limit_scaling(500.0, 4, None).final_points, 0);
/// ```
pub fn limit_scaling(limit_points: f64, tier: u8, archetype: Option<&str>) -> LimitScaling {
    let multiplier = archetype_multiplier(tier, archetype);
    let scaled = limit_points * multiplier;

    let first_threshold = f64::from(tier) * FIRST_BUCKET_TIER_SPAN;
    let second_threshold = f64::from(tier) * SECOND_BUCKET_TIER_SPAN;

    let total_value = if scaled <= first_threshold {
        scaled * FIRST_BUCKET_RATE
    } else if scaled <= first_threshold + second_threshold {
        first_threshold * FIRST_BUCKET_RATE + (scaled - first_threshold) * SECOND_BUCKET_RATE
    } else {
        first_threshold * FIRST_BUCKET_RATE
            + second_threshold * SECOND_BUCKET_RATE
            + (scaled - first_threshold - second_threshold) * THIRD_BUCKET_RATE
    };

    let final_points = ((total_value / POINT_GRANULARITY).ceil() * POINT_GRANULARITY) as i32;

    LimitScaling {
        total_value,
        final_points,
        scaled_limit_points: scaled,
        archetype_multiplier: multiplier,
    }
}

/// Whether a tier is inside the playable range.
pub fn is_valid_tier(tier: u8) -> bool {
    (MIN_TIER..=MAX_TIER).contains(&tier)
}

/// Tier bonus lookup. A table in the rulebook, not a formula.
pub fn tier_bonus(tier: u8) -> i32 {
    match tier {
        0..=2 => 1,
        3 | 4 => 2,
        _ => 3,
    }
}

/// Base hit points. Flat across tiers in the current edition; tier affects
/// the other survivability stats instead.
pub fn base_hp() -> f64 {
    BASE_HP
}

/// Base movement: the better of `mobility + 6` and `mobility + tier`.
pub fn base_movement(mobility: u8, tier: u8) -> f64 {
    let mobility = f64::from(mobility);
    (mobility + f64::from(BASE_MOVEMENT_BONUS)).max(mobility + f64::from(tier))
}

/// Base pool sizes granted by a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierPools {
    /// Combat attribute points: `tier * 2`
    pub combat_attributes: i32,
    /// Utility attribute points: `tier`
    pub utility_attributes: i32,
    /// Legacy-edition main pool: `max(0, (tier - 2) * 15)`
    pub main_pool_legacy: i32,
    /// Utility pool: `max(0, 5 * (tier - 2))`
    pub utility_pool: i32,
}

/// Computes the base pool sizes for a tier.
///
/// # Errors
///
/// Returns [`VitalityError::InvalidTier`] when the tier is outside 2..=5.
/// Unlike archetype lookups, which degrade to no-ops, there is no sensible
/// pool layout for an out-of-range tier.
pub fn pools_for_tier(tier: u8) -> VitalityResult<TierPools> {
    if !is_valid_tier(tier) {
        return Err(VitalityError::InvalidTier(tier));
    }
    let t = i32::from(tier);
    Ok(TierPools {
        combat_attributes: t * 2,
        utility_attributes: t,
        main_pool_legacy: ((t - 2) * crate::constants::LEGACY_MAIN_POOL_PER_TIER).max(0),
        utility_pool: (crate::constants::UTILITY_POOL_PER_TIER * (t - 2)).max(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_multipliers() {
        assert_eq!(archetype_multiplier(6, Some("normal")), 1.0);
        assert_eq!(archetype_multiplier(3, Some("specialist")), 1.0);
        assert_eq!(archetype_multiplier(4, Some("straightforward")), 2.0);
        assert_eq!(archetype_multiplier(2, Some("shared_uses")), 1.0);
        assert_eq!(archetype_multiplier(4, Some("paragon")), 0.0);
        assert_eq!(archetype_multiplier(4, None), 0.0);
    }

    #[test]
    fn test_first_bucket_full_value() {
        // shared_uses keeps points unscaled; 30 is inside tier 4's first
        // bucket (40) so it passes through at full value.
        let scaling = limit_scaling(30.0, 4, Some("shared_uses"));
        assert!((scaling.total_value - 30.0).abs() < 1e-9);
        assert_eq!(scaling.final_points, 30);
    }

    #[test]
    fn test_first_bucket_boundary_exact() {
        // tier 4 normal: 60 * 4/6 lands exactly on the 40-point boundary.
        let scaling = limit_scaling(60.0, 4, Some("normal"));
        assert!((scaling.scaled_limit_points - 40.0).abs() < 1e-9);
        assert!((scaling.total_value - 40.0).abs() < 1e-9);
        assert_eq!(scaling.final_points, 40);
    }

    #[test]
    fn test_second_bucket_half_rate() {
        // tier 4 shared_uses, 60 points: 40 full + 20 at half = 50.
        let scaling = limit_scaling(60.0, 4, Some("shared_uses"));
        assert!((scaling.total_value - 50.0).abs() < 1e-9);
        assert_eq!(scaling.final_points, 50);
    }

    #[test]
    fn test_third_bucket_quarter_rate() {
        // tier 4 shared_uses, 140 points: 40 + 80*0.5 + 20*0.25 = 85 → 90.
        let scaling = limit_scaling(140.0, 4, Some("shared_uses"));
        assert!((scaling.total_value - 85.0).abs() < 1e-9);
        assert_eq!(scaling.final_points, 90);
    }

    #[test]
    fn test_rounding_up_to_nearest_ten() {
        let scaling = limit_scaling(31.0, 4, Some("shared_uses"));
        assert_eq!(scaling.final_points, 40);
        assert!(f64::from(scaling.final_points) >= scaling.total_value);
    }

    #[test]
    fn test_multiplier_applied_before_buckets() {
        // tier 4 straightforward (x2): 30 points scale to 60, crossing into
        // the second bucket. If the multiplier were applied after the
        // buckets the result would be 60 instead of 50.
        let scaling = limit_scaling(30.0, 4, Some("straightforward"));
        assert!((scaling.total_value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_multiplier_flattens_everything() {
        for points in [0.0, 10.0, 1000.0] {
            let scaling = limit_scaling(points, 4, Some("one_trick"));
            assert_eq!(scaling.final_points, 0);
            assert_eq!(scaling.archetype_multiplier, 0.0);
        }
    }

    #[test]
    fn test_base_movement_takes_better_of_bonus_and_tier() {
        assert_eq!(base_movement(2, 3), 8.0); // mobility + 6 beats mobility + tier
        assert_eq!(base_movement(0, 5), 6.0);
        assert_eq!(base_movement(3, 5), 9.0);
    }

    #[test]
    fn test_base_hp_flat_across_tiers() {
        assert_eq!(base_hp(), 100.0);
    }

    #[test]
    fn test_pools_for_tier() {
        let pools = pools_for_tier(4).unwrap();
        assert_eq!(pools.combat_attributes, 8);
        assert_eq!(pools.utility_attributes, 4);
        assert_eq!(pools.main_pool_legacy, 30);
        assert_eq!(pools.utility_pool, 10);
    }

    #[test]
    fn test_tier_two_gets_empty_optional_pools() {
        let pools = pools_for_tier(2).unwrap();
        assert_eq!(pools.main_pool_legacy, 0);
        assert_eq!(pools.utility_pool, 0);
    }

    #[test]
    fn test_invalid_tier_is_an_error() {
        assert!(matches!(
            pools_for_tier(1),
            Err(crate::VitalityError::InvalidTier(1))
        ));
        assert!(matches!(
            pools_for_tier(6),
            Err(crate::VitalityError::InvalidTier(6))
        ));
    }
}
