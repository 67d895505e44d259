//! # Import / Export
//!
//! Whole-character JSON persistence plus the Roll20 export subset. Only the
//! character record is ever serialized for storage; derived stats and pools
//! are recomputed on load, never trusted from a file.

use crate::character::{ArchetypeSelections, Attributes, Character, StatKind};
use crate::engine::stats::CalculatedStats;
use crate::VitalityResult;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Serializes a character for storage or export.
pub fn to_json_string(character: &Character) -> VitalityResult<String> {
    Ok(serde_json::to_string_pretty(character)?)
}

/// Deserializes a character from JSON.
pub fn from_json_str(json: &str) -> VitalityResult<Character> {
    Ok(serde_json::from_str(json)?)
}

/// Writes a character to a JSON file.
pub fn save_to_file(path: impl AsRef<Path>, character: &Character) -> VitalityResult<()> {
    let json = to_json_string(character)?;
    fs::write(path, json)?;
    log::info!("saved character '{}'", character.name);
    Ok(())
}

/// Reads a character from a JSON file.
pub fn load_from_file(path: impl AsRef<Path>) -> VitalityResult<Character> {
    let json = fs::read_to_string(path)?;
    from_json_str(&json)
}

/// The special-attack subset carried by a Roll20 export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roll20Attack {
    pub name: String,
    pub attack_types: Vec<String>,
    pub limit_points_total: f64,
    pub upgrade_points_available: i32,
}

/// The character subset exported to Roll20.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roll20Sheet {
    pub name: String,
    pub level: u8,
    pub tier: u8,
    pub attributes: Attributes,
    pub archetypes: ArchetypeSelections,
    /// Boon ids only; the sheet resolves display names itself
    pub boons: Vec<String>,
    /// The first special attack, if any
    pub special_attack: Option<Roll20Attack>,
    /// Final stat values keyed by stat name
    pub calculated_stats: BTreeMap<StatKind, f64>,
}

/// Builds the Roll20 export subset from a character and its calculated
/// stats. The caller supplies the stats so the export never triggers a
/// recomputation of its own.
pub fn roll20_sheet(character: &Character, stats: &CalculatedStats) -> Roll20Sheet {
    Roll20Sheet {
        name: character.name.clone(),
        level: character.level,
        tier: character.tier,
        attributes: character.attributes,
        archetypes: character.archetypes.clone(),
        boons: character
            .main_pool_purchases
            .boons
            .iter()
            .map(|b| b.boon_id.clone())
            .collect(),
        special_attack: character.special_attacks.first().map(|attack| Roll20Attack {
            name: attack.name.clone(),
            attack_types: attack.attack_types.clone(),
            limit_points_total: attack.limit_points(),
            upgrade_points_available: attack.upgrade_points_available,
        }),
        calculated_stats: StatKind::ALL
            .into_iter()
            .map(|stat| (stat, stats.final_stats.get(stat)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{ArchetypeCategory, BoonPurchase, Limit, SpecialAttack};
    use crate::engine::stats;

    fn sample_character() -> Character {
        let mut character = Character::new("Ashfall", 3);
        character.attributes.focus = 2;
        character.attributes.power = 2;
        character
            .archetypes
            .select(ArchetypeCategory::SpecialAttack, "normal");
        character
            .main_pool_purchases
            .boons
            .push(BoonPurchase::new("robust", 1));
        let mut attack = SpecialAttack::new("Cinder Wave");
        attack.attack_types.push("area".to_string());
        attack.limits.push(Limit::new("charge_up", 60.0));
        attack.refresh_derived(character.tier, Some("normal"));
        character.special_attacks.push(attack);
        character
    }

    #[test]
    fn test_character_json_round_trip() {
        let character = sample_character();
        let json = to_json_string(&character).unwrap();
        let restored = from_json_str(&json).unwrap();
        assert_eq!(character.id, restored.id);
        assert_eq!(character.attributes, restored.attributes);
        assert_eq!(character.special_attacks, restored.special_attacks);
    }

    #[test]
    fn test_malformed_json_is_a_serde_error() {
        let result = from_json_str("{\"name\": ");
        assert!(matches!(result, Err(crate::VitalityError::Serde(_))));
    }

    #[test]
    fn test_roll20_sheet_subset() {
        let character = sample_character();
        let calculated = stats::compute_all(&character);
        let sheet = roll20_sheet(&character, &calculated);

        assert_eq!(sheet.tier, 4);
        assert_eq!(sheet.boons, vec!["robust".to_string()]);
        let attack = sheet.special_attack.expect("attack should export");
        assert_eq!(attack.upgrade_points_available, 40);
        assert_eq!(sheet.calculated_stats[&StatKind::Accuracy], 6.0);
        // robust boon is reflected in the exported final stats
        assert_eq!(sheet.calculated_stats[&StatKind::Hp], 120.0);
    }

    #[test]
    fn test_roll20_sheet_serializes_with_string_stat_keys() {
        let character = sample_character();
        let calculated = stats::compute_all(&character);
        let sheet = roll20_sheet(&character, &calculated);
        let json = serde_json::to_string(&sheet).unwrap();
        assert!(json.contains("\"accuracy\""));
        assert!(json.contains("\"calculated_stats\""));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ashfall.json");
        let character = sample_character();
        save_to_file(&path, &character).unwrap();
        let restored = load_from_file(&path).unwrap();
        assert_eq!(character.name, restored.name);
        assert_eq!(character.id, restored.id);
    }
}
