//! Integration tests for the budget engine: pools, stats, caching and
//! export working together over whole characters.

use std::sync::Arc;
use vitality::{
    export, ArchetypeCategory, BoonPurchase, Character, FlawPurchase, Limit, PointPoolCalculator,
    RulesetEdition, SpecialAttack, StatCalculator, StatKind, TraitPurchase, Upgrade,
};

/// Builds the reference tier-4 character used across the suite.
fn tier_four_striker() -> Character {
    let mut character = Character::new("Striker", 3); // level 3 → tier 4
    character.attributes.focus = 2;
    character.attributes.power = 2;
    character
}

/// Spec scenario: tier 4, focus 2, power 2, nothing else purchased.
#[test]
fn test_baseline_character_end_to_end() {
    let character = tier_four_striker();
    let mut stats = StatCalculator::new();
    let mut pools = PointPoolCalculator::new();

    let calculated = stats.calculate_all_stats(&character).unwrap();
    assert_eq!(calculated.base.accuracy, 6.0); // tier + focus
    assert_eq!(calculated.base.damage, 7.0); // tier + power * 1.5
    assert_eq!(calculated.final_stats.hp, 100.0);

    let budget = pools.calculate_all_pools(&character).unwrap();
    assert_eq!(budget.combat_attributes.available, 8);
    assert_eq!(budget.combat_attributes.spent, 4);
    assert_eq!(budget.combat_attributes.remaining(), 4);

    let validation = pools.validate_point_spending(&character).unwrap();
    assert!(validation.is_within_budget());
}

/// Spec scenario: normal archetype at tier 4 with 60 limit points lands
/// exactly on the first bucket boundary.
#[test]
fn test_normal_archetype_attack_pool() {
    let mut character = tier_four_striker();
    character
        .archetypes
        .select(ArchetypeCategory::SpecialAttack, "normal");
    let mut attack = SpecialAttack::new("Lance");
    attack.limits.push(Limit::new("charge_up", 60.0));
    character.special_attacks.push(attack);

    let mut pools = PointPoolCalculator::new();
    let budget = pools.calculate_all_pools(&character).unwrap();
    let pool = &budget.special_attacks[0];
    assert_eq!(pool.available, 40);
    let scaling = pool.scaling.unwrap();
    assert!((scaling.scaled_limit_points - 40.0).abs() < 1e-9);
    assert!((scaling.total_value - 40.0).abs() < 1e-9);
}

/// Spec scenario: paragon pool is tier * 10 no matter what limits exist.
#[test]
fn test_paragon_attack_pool_ignores_limits() {
    let mut character = tier_four_striker();
    character
        .archetypes
        .select(ArchetypeCategory::SpecialAttack, "paragon");
    let mut attack = SpecialAttack::new("Signature");
    attack.limits.push(Limit::new("anything", 9999.0));
    character.special_attacks.push(attack);

    let mut pools = PointPoolCalculator::new();
    let budget = pools.calculate_all_pools(&character).unwrap();
    assert_eq!(budget.special_attacks[0].available, 40);
    assert!(budget.special_attacks[0].scaling.is_none());
}

/// Breakdown entries sum to the final value for every stat on a character
/// that exercises every pipeline stage at once.
#[test]
fn test_breakdown_mirrors_pipeline_on_loaded_character() {
    let mut character = tier_four_striker();
    character.attributes.mobility = 1;
    character.attributes.endurance = 2;
    character
        .archetypes
        .select(ArchetypeCategory::UniqueAbility, "cut_above");
    character
        .archetypes
        .select(ArchetypeCategory::Defensive, "juggernaut");
    character
        .archetypes
        .select(ArchetypeCategory::Movement, "swift");
    character
        .main_pool_purchases
        .boons
        .push(BoonPurchase::new("combat_reflexes", 1));
    character
        .main_pool_purchases
        .boons
        .push(BoonPurchase::new("robust", 1));
    character.main_pool_purchases.traits.push(TraitPurchase::new(
        "Veteran",
        10,
        vec![StatKind::Accuracy, StatKind::Initiative],
    ));
    character.main_pool_purchases.traits.push(TraitPurchase::new(
        "Hardened",
        10,
        vec![StatKind::Accuracy, StatKind::Durability],
    ));
    character
        .main_pool_purchases
        .flaws
        .push(FlawPurchase::new("sickly", "Sickly", StatKind::Resolve));
    character
        .main_pool_purchases
        .flaws
        .push(FlawPurchase::new("unresponsive", "Unresponsive", StatKind::Stability));

    let mut stats = StatCalculator::new();
    let calculated = stats.calculate_all_stats(&character).unwrap();
    for stat in StatKind::ALL {
        let total = calculated.breakdown_total(stat);
        let final_value = calculated.final_stats.get(stat);
        assert!(
            (total - final_value).abs() < 1e-9,
            "{}: breakdown {} != final {}",
            stat,
            total,
            final_value
        );
    }
    // spot-check the penalties landed
    assert_eq!(calculated.final_stats.reactions, 0.0);
    assert_eq!(calculated.final_stats.hp, 100.0 + 20.0 + 20.0 - 30.0);
}

/// Calculators return the same Arc until the character actually changes.
#[test]
fn test_cache_idempotence_across_calculators() {
    let mut character = tier_four_striker();
    let mut stats = StatCalculator::new();
    let mut pools = PointPoolCalculator::new();

    let stats_a = stats.calculate_all_stats(&character).unwrap();
    let stats_b = stats.calculate_all_stats(&character).unwrap();
    let pools_a = pools.calculate_all_pools(&character).unwrap();
    let pools_b = pools.calculate_all_pools(&character).unwrap();
    assert!(Arc::ptr_eq(&stats_a, &stats_b));
    assert!(Arc::ptr_eq(&pools_a, &pools_b));

    character.attributes.power = 3;
    let stats_c = stats.calculate_all_stats(&character).unwrap();
    let pools_c = pools.calculate_all_pools(&character).unwrap();
    assert!(!Arc::ptr_eq(&stats_a, &stats_c));
    assert!(!Arc::ptr_eq(&pools_a, &pools_c));
    assert_eq!(stats_c.base.damage, 4.0 + 3.0 * 1.5);
    assert_eq!(pools_c.combat_attributes.spent, 5);
}

/// Two characters sharing one calculator never see each other's results.
#[test]
fn test_two_characters_share_one_calculator_safely() {
    let mut first = tier_four_striker();
    first.attributes.power = 4;
    let second = Character::new("Other", 1); // tier 3

    let mut stats = StatCalculator::new();
    let first_stats = stats.calculate_all_stats(&first).unwrap();
    let second_stats = stats.calculate_all_stats(&second).unwrap();
    let first_again = stats.calculate_all_stats(&first).unwrap();

    assert_eq!(second_stats.base.accuracy, 3.0);
    assert!(Arc::ptr_eq(&first_stats, &first_again));
    assert_ne!(first_stats.base.damage, second_stats.base.damage);
}

/// The same character is cheaper under legacy flaw economics and the two
/// editions never agree on the main pool.
#[test]
fn test_flaw_economics_differ_between_editions() {
    let mut character = tier_four_striker();
    character
        .main_pool_purchases
        .flaws
        .push(FlawPurchase::new("slow", "Slow", StatKind::Durability));

    let mut simplified = PointPoolCalculator::new();
    let mut legacy = PointPoolCalculator::with_edition(RulesetEdition::Legacy);

    let simple = simplified.calculate_all_pools(&character).unwrap();
    let legacy_pools = legacy.calculate_all_pools(&character).unwrap();

    assert_eq!(simple.main_pool.available, 3); // level
    assert_eq!(simple.main_pool.spent, 30);
    assert_eq!(simple.flaw_bonuses, 0);

    assert_eq!(legacy_pools.main_pool.available, 60); // 30 base + 30 granted
    assert_eq!(legacy_pools.main_pool.spent, 0);
    assert_eq!(legacy_pools.flaw_bonuses, 30);
}

/// Overspending warns but never blocks: the pools still compute and the
/// purchase stays on the record.
#[test]
fn test_overspend_is_surfaced_not_blocked() {
    let mut character = tier_four_striker();
    character
        .archetypes
        .select(ArchetypeCategory::SpecialAttack, "basic");
    let mut attack = SpecialAttack::new("Overreach");
    attack.upgrades.push(Upgrade::new("everything", 100));
    character.special_attacks.push(attack);
    character.main_pool_purchases.traits.push(TraitPurchase::new(
        "Gilded",
        40,
        vec![StatKind::Avoidance],
    ));

    let mut pools = PointPoolCalculator::new();
    let validation = pools.validate_point_spending(&character).unwrap();
    assert!(!validation.is_within_budget());
    assert_eq!(validation.errors.len(), 2);

    let budget = pools.calculate_all_pools(&character).unwrap();
    assert!(budget.main_pool.remaining() < 0);
    assert!(budget.special_attacks[0].remaining() < 0);
    assert_eq!(character.main_pool_purchases.traits.len(), 1);
}

/// Full lifecycle: build, save, reload, recompute, export.
#[test]
fn test_character_lifecycle_round_trip() {
    let mut character = tier_four_striker();
    character
        .archetypes
        .select(ArchetypeCategory::SpecialAttack, "specialist");
    let mut attack = SpecialAttack::new("Piercing Bolt");
    attack.limits.push(Limit::new("reload", 30.0));
    attack.upgrades.push(Upgrade::new("armor_piercing", 20));
    attack.refresh_derived(character.tier, Some("specialist"));
    character.special_attacks.push(attack);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("striker.json");
    export::save_to_file(&path, &character).unwrap();
    let restored = export::load_from_file(&path).unwrap();
    assert_eq!(restored.id, character.id);

    // derived data is recomputed, not read from the file
    let mut stats = StatCalculator::new();
    let mut pools = PointPoolCalculator::new();
    let calculated = stats.calculate_all_stats(&restored).unwrap();
    let budget = pools.calculate_all_pools(&restored).unwrap();

    // specialist at tier 4: 30 * 4/3 = 40 scaled = first bucket boundary
    assert_eq!(budget.special_attacks[0].available, 40);
    assert_eq!(budget.special_attacks[0].spent, 20);

    let sheet = export::roll20_sheet(&restored, &calculated);
    assert_eq!(sheet.special_attack.unwrap().upgrade_points_available, 40);
    assert_eq!(sheet.calculated_stats[&StatKind::Damage], 7.0);
}
