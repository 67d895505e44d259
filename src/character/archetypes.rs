//! # Archetype Selections
//!
//! The seven mutually-exclusive archetype categories. Selections are stored
//! as nullable string keys into the static effect registries in
//! [`crate::engine::effects`]; unknown keys are silent no-ops there, which
//! lets saved characters from newer rule editions load without failing.

use serde::{Deserialize, Serialize};

/// The seven archetype categories. Exactly one archetype per category may be
/// active at a time; selecting a second replaces the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeCategory {
    Movement,
    AttackType,
    EffectType,
    UniqueAbility,
    Defensive,
    SpecialAttack,
    Utility,
}

impl ArchetypeCategory {
    /// All categories, in sheet order.
    pub const ALL: [ArchetypeCategory; 7] = [
        ArchetypeCategory::Movement,
        ArchetypeCategory::AttackType,
        ArchetypeCategory::EffectType,
        ArchetypeCategory::UniqueAbility,
        ArchetypeCategory::Defensive,
        ArchetypeCategory::SpecialAttack,
        ArchetypeCategory::Utility,
    ];

    /// Archetype ids the current rule edition defines for this category.
    pub fn known_ids(self) -> &'static [&'static str] {
        match self {
            ArchetypeCategory::Movement => &["swift", "skirmisher", "behemoth", "flight"],
            ArchetypeCategory::AttackType => {
                &["aoe_specialist", "direct_specialist", "crowd_fighter"]
            }
            ArchetypeCategory::EffectType => {
                &["damage_specialist", "hybrid_specialist", "crowd_control"]
            }
            ArchetypeCategory::UniqueAbility => {
                &["cut_above", "versatile_master", "extraordinary"]
            }
            ArchetypeCategory::Defensive => &["resilient", "fortress", "immutable", "juggernaut"],
            ArchetypeCategory::SpecialAttack => &[
                "normal",
                "specialist",
                "straightforward",
                "shared_uses",
                "paragon",
                "one_trick",
                "dual_natured",
                "basic",
            ],
            ArchetypeCategory::Utility => &["practical", "specialized", "jack_of_all_trades"],
        }
    }
}

impl std::fmt::Display for ArchetypeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArchetypeCategory::Movement => "movement",
            ArchetypeCategory::AttackType => "attack type",
            ArchetypeCategory::EffectType => "effect type",
            ArchetypeCategory::UniqueAbility => "unique ability",
            ArchetypeCategory::Defensive => "defensive",
            ArchetypeCategory::SpecialAttack => "special attack",
            ArchetypeCategory::Utility => "utility",
        };
        f.write_str(name)
    }
}

/// One nullable archetype selection per category.
///
/// # Examples
///
/// ```
/// use vitality::{ArchetypeCategory, ArchetypeSelections};
///
/// let mut selections = ArchetypeSelections::default();
/// selections.select(ArchetypeCategory::Defensive, "resilient");
/// selections.select(ArchetypeCategory::Defensive, "juggernaut"); // replaces
/// assert_eq!(selections.get(ArchetypeCategory::Defensive), Some("juggernaut"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeSelections {
    pub movement: Option<String>,
    pub attack_type: Option<String>,
    pub effect_type: Option<String>,
    pub unique_ability: Option<String>,
    pub defensive: Option<String>,
    pub special_attack: Option<String>,
    pub utility: Option<String>,
}

impl ArchetypeSelections {
    /// Returns the active archetype id for a category, if any.
    pub fn get(&self, category: ArchetypeCategory) -> Option<&str> {
        let slot = match category {
            ArchetypeCategory::Movement => &self.movement,
            ArchetypeCategory::AttackType => &self.attack_type,
            ArchetypeCategory::EffectType => &self.effect_type,
            ArchetypeCategory::UniqueAbility => &self.unique_ability,
            ArchetypeCategory::Defensive => &self.defensive,
            ArchetypeCategory::SpecialAttack => &self.special_attack,
            ArchetypeCategory::Utility => &self.utility,
        };
        slot.as_deref()
    }

    /// Selects an archetype in a category, replacing any previous selection.
    pub fn select(&mut self, category: ArchetypeCategory, id: impl Into<String>) {
        *self.slot_mut(category) = Some(id.into());
    }

    /// Clears the selection in a category.
    pub fn clear(&mut self, category: ArchetypeCategory) {
        *self.slot_mut(category) = None;
    }

    /// Ids selected but unknown to the current rule edition.
    pub fn unknown_selections(&self) -> Vec<(ArchetypeCategory, String)> {
        ArchetypeCategory::ALL
            .into_iter()
            .filter_map(|category| {
                self.get(category)
                    .filter(|id| !category.known_ids().contains(id))
                    .map(|id| (category, id.to_string()))
            })
            .collect()
    }

    fn slot_mut(&mut self, category: ArchetypeCategory) -> &mut Option<String> {
        match category {
            ArchetypeCategory::Movement => &mut self.movement,
            ArchetypeCategory::AttackType => &mut self.attack_type,
            ArchetypeCategory::EffectType => &mut self.effect_type,
            ArchetypeCategory::UniqueAbility => &mut self.unique_ability,
            ArchetypeCategory::Defensive => &mut self.defensive,
            ArchetypeCategory::SpecialAttack => &mut self.special_attack,
            ArchetypeCategory::Utility => &mut self.utility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_replaces_never_appends() {
        let mut selections = ArchetypeSelections::default();
        selections.select(ArchetypeCategory::Movement, "swift");
        selections.select(ArchetypeCategory::Movement, "behemoth");
        assert_eq!(selections.get(ArchetypeCategory::Movement), Some("behemoth"));
    }

    #[test]
    fn test_clear_selection() {
        let mut selections = ArchetypeSelections::default();
        selections.select(ArchetypeCategory::Utility, "practical");
        selections.clear(ArchetypeCategory::Utility);
        assert_eq!(selections.get(ArchetypeCategory::Utility), None);
    }

    #[test]
    fn test_unknown_selection_detected() {
        let mut selections = ArchetypeSelections::default();
        selections.select(ArchetypeCategory::Defensive, "resilient");
        selections.select(ArchetypeCategory::SpecialAttack, "from_the_future");
        let unknown = selections.unknown_selections();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].0, ArchetypeCategory::SpecialAttack);
    }

    #[test]
    fn test_every_category_has_known_ids() {
        for category in ArchetypeCategory::ALL {
            assert!(!category.known_ids().is_empty(), "{} has no ids", category);
        }
    }
}
