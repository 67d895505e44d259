//! # Special Attacks
//!
//! Special attacks are assembled from limits (self-imposed restrictions that
//! generate limit points) and upgrades (bought with the upgrade points those
//! limit points scale into). The scaling itself lives in
//! [`crate::engine::tier`]; the derived totals stored here are convenience
//! copies that the pool calculator never trusts — it always recomputes.

use crate::engine::pools::{attack_points_available, PoolMethod};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A self-imposed restriction on a special attack, worth limit points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub id: String,
    pub points: f64,
}

impl Limit {
    pub fn new(id: impl Into<String>, points: f64) -> Self {
        Self {
            id: id.into(),
            points,
        }
    }
}

/// An upgrade purchased with an attack's upgrade points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: String,
    pub cost: i32,
    #[serde(default)]
    pub is_specialty: bool,
}

impl Upgrade {
    pub fn new(id: impl Into<String>, cost: i32) -> Self {
        Self {
            id: id.into(),
            cost,
            is_specialty: false,
        }
    }
}

/// A special attack under construction.
///
/// The `upgrade_points_*` fields are derived values kept in sync by
/// [`SpecialAttack::refresh_derived`]; `upgrade_points_available` is never
/// set directly — it follows from the special-attack archetype and the
/// limits taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialAttack {
    pub id: Uuid,
    pub name: String,
    pub attack_types: Vec<String>,
    pub effect_types: Vec<String>,
    pub basic_conditions: Vec<String>,
    pub advanced_conditions: Vec<String>,
    pub limits: Vec<Limit>,
    pub upgrades: Vec<Upgrade>,
    pub limit_points_total: f64,
    pub upgrade_points_from_limits: i32,
    pub upgrade_points_available: i32,
    pub upgrade_points_spent: i32,
}

impl SpecialAttack {
    /// Creates an empty attack with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            attack_types: Vec::new(),
            effect_types: Vec::new(),
            basic_conditions: Vec::new(),
            advanced_conditions: Vec::new(),
            limits: Vec::new(),
            upgrades: Vec::new(),
            limit_points_total: 0.0,
            upgrade_points_from_limits: 0,
            upgrade_points_available: 0,
            upgrade_points_spent: 0,
        }
    }

    /// Sum of limit points across all limits taken.
    pub fn limit_points(&self) -> f64 {
        self.limits.iter().map(|l| l.points).sum()
    }

    /// Sum of upgrade costs across all upgrades purchased.
    pub fn upgrade_spend(&self) -> i32 {
        self.upgrades.iter().map(|u| u.cost).sum()
    }

    /// Recomputes the stored derived totals from limits, upgrades and the
    /// character's special-attack archetype.
    pub fn refresh_derived(&mut self, tier: u8, archetype: Option<&str>) {
        self.limit_points_total = self.limit_points();
        let (method, available, scaling) =
            attack_points_available(tier, archetype, self.limit_points_total);
        self.upgrade_points_from_limits = match (method, scaling) {
            (PoolMethod::LimitScaling, Some(scaling)) => scaling.final_points,
            _ => 0,
        };
        self.upgrade_points_available = available;
        self.upgrade_points_spent = self.upgrade_spend();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_points_sum() {
        let mut attack = SpecialAttack::new("Flame Lance");
        attack.limits.push(Limit::new("unhealthy", 30.0));
        attack.limits.push(Limit::new("charge_up", 30.0));
        assert_eq!(attack.limit_points(), 60.0);
    }

    #[test]
    fn test_refresh_derived_normal_archetype() {
        // tier 4 normal: 60 * 4/6 = 40 scaled, first bucket boundary
        let mut attack = SpecialAttack::new("Flame Lance");
        attack.limits.push(Limit::new("unhealthy", 60.0));
        attack.upgrades.push(Upgrade::new("high_impact", 20));
        attack.refresh_derived(4, Some("normal"));
        assert_eq!(attack.limit_points_total, 60.0);
        assert_eq!(attack.upgrade_points_available, 40);
        assert_eq!(attack.upgrade_points_spent, 20);
    }

    #[test]
    fn test_refresh_derived_fixed_archetype_ignores_limits() {
        let mut attack = SpecialAttack::new("Mystery");
        attack.limits.push(Limit::new("unhealthy", 100.0));
        attack.refresh_derived(4, Some("paragon"));
        assert_eq!(attack.upgrade_points_from_limits, 0);
        assert_eq!(attack.upgrade_points_available, 40);
    }

    #[test]
    fn test_refresh_derived_no_archetype_yields_nothing() {
        let mut attack = SpecialAttack::new("Mystery");
        attack.limits.push(Limit::new("unhealthy", 100.0));
        attack.refresh_derived(4, None);
        assert_eq!(attack.upgrade_points_available, 0);
    }
}
