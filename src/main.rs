//! # Vitality CLI
//!
//! Command-line companion for the character engine: create characters,
//! summarize their pools and stats, validate budgets, export Roll20 sheets
//! and roll demo attacks.

use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use vitality::{
    export, resolve_attack, tier, Character, DiceRoller, PointPoolCalculator, RulesetEdition,
    StatCalculator, StatKind, VitalityError, VitalityResult,
};

/// Command line arguments for the Vitality character tool.
#[derive(Parser, Debug)]
#[command(name = "vitality")]
#[command(about = "Character creation engine for the Vitality System")]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a fresh character and print (or save) its JSON
    New {
        /// Character name
        name: String,
        /// Starting level (1-5)
        #[arg(short, long, default_value_t = 1)]
        level: u8,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print point pools, final stats and warnings for a character file
    Summary {
        file: PathBuf,
        /// Flaw economy: simplified or legacy
        #[arg(long, default_value = "simplified")]
        edition: String,
    },
    /// Report budget overruns and structural warnings
    Validate {
        file: PathBuf,
        #[arg(long, default_value = "simplified")]
        edition: String,
    },
    /// Export the Roll20 subset for a character file
    ExportRoll20 {
        file: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Roll a demo attack against a training dummy
    Roll {
        file: PathBuf,
        /// Seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> VitalityResult<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .parse_filters(&cli.log_level)
        .init();

    info!("Vitality engine v{}", vitality::VERSION);

    match cli.command {
        Command::New {
            name,
            level,
            output,
        } => cmd_new(&name, level, output),
        Command::Summary { file, edition } => cmd_summary(&file, parse_edition(&edition)?),
        Command::Validate { file, edition } => cmd_validate(&file, parse_edition(&edition)?),
        Command::ExportRoll20 { file, output } => cmd_export(&file, output),
        Command::Roll { file, seed } => cmd_roll(&file, seed),
    }
}

fn parse_edition(name: &str) -> VitalityResult<RulesetEdition> {
    match name {
        "simplified" => Ok(RulesetEdition::Simplified),
        "legacy" => Ok(RulesetEdition::Legacy),
        other => Err(VitalityError::InvalidCharacter(format!(
            "unknown edition '{}', expected 'simplified' or 'legacy'",
            other
        ))),
    }
}

fn cmd_new(name: &str, level: u8, output: Option<PathBuf>) -> VitalityResult<()> {
    let character = Character::new(name, level);
    match output {
        Some(path) => {
            export::save_to_file(&path, &character)?;
            println!("Wrote {} (level {}, tier {})", path.display(), character.level, character.tier);
        }
        None => println!("{}", export::to_json_string(&character)?),
    }
    Ok(())
}

fn cmd_summary(file: &PathBuf, edition: RulesetEdition) -> VitalityResult<()> {
    let character = export::load_from_file(file)?;
    let mut pool_calculator = PointPoolCalculator::with_edition(edition);
    let mut stat_calculator = StatCalculator::new();

    let pools = pool_calculator.calculate_all_pools(&character)?;
    let stats = stat_calculator.calculate_all_stats(&character)?;

    println!(
        "{} — level {}, tier {} (tier bonus +{})",
        character.name,
        character.level,
        character.tier,
        tier::tier_bonus(character.tier)
    );

    println!("\nPoint pools (available / spent / remaining):");
    for (name, balance) in [
        ("Combat attributes", pools.combat_attributes),
        ("Utility attributes", pools.utility_attributes),
        ("Main pool", pools.main_pool),
        ("Utility pool", pools.utility_pool),
        ("Special attacks", pools.special_attack_totals),
    ] {
        println!(
            "  {:<20} {:>4} / {:>4} / {:>4}",
            name,
            balance.available,
            balance.spent,
            balance.remaining()
        );
    }
    for attack in &pools.special_attacks {
        println!(
            "    {:<18} {:>4} / {:>4} / {:>4}  [{:?}]",
            attack.name,
            attack.available,
            attack.spent,
            attack.remaining(),
            attack.method
        );
    }
    println!(
        "  {:<20} {:>4} / {:>4} / {:>4}",
        "Total",
        pools.total_available,
        pools.total_spent,
        pools.total_remaining()
    );

    println!("\nFinal stats:");
    for stat in StatKind::ALL {
        println!("  {:<12} {:>6.1}", stat.label(), stats.final_stats.get(stat));
    }
    if !stats.final_stats.immunities.is_empty() {
        println!(
            "  Immunities: {}",
            stats
                .final_stats
                .immunities
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let warnings = character.validate();
    let validation = pool_calculator.validate_point_spending(&character)?;
    for warning in warnings.iter().chain(validation.errors.iter()) {
        println!("warning: {}", warning);
    }
    Ok(())
}

fn cmd_validate(file: &PathBuf, edition: RulesetEdition) -> VitalityResult<()> {
    let character = export::load_from_file(file)?;
    let mut pool_calculator = PointPoolCalculator::with_edition(edition);

    let mut findings = character.validate();
    for (category, id) in character.archetypes.unknown_selections() {
        findings.push(format!("Unknown {} archetype '{}'", category, id));
    }
    findings.extend(pool_calculator.validate_point_spending(&character)?.errors);

    if findings.is_empty() {
        println!("{}: no warnings", character.name);
    } else {
        for finding in &findings {
            println!("warning: {}", finding);
        }
        println!("{} warning(s)", findings.len());
    }
    Ok(())
}

fn cmd_export(file: &PathBuf, output: Option<PathBuf>) -> VitalityResult<()> {
    let character = export::load_from_file(file)?;
    let mut stat_calculator = StatCalculator::new();
    let stats = stat_calculator.calculate_all_stats(&character)?;
    let sheet = export::roll20_sheet(&character, &stats);
    let json = serde_json::to_string_pretty(&sheet)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_roll(file: &PathBuf, seed: Option<u64>) -> VitalityResult<()> {
    let character = export::load_from_file(file)?;
    let mut stat_calculator = StatCalculator::new();
    let attacker = stat_calculator.calculate_all_stats(&character)?;

    let dummy = Character::new("Training Dummy", character.level);
    let defender = stat_calculator.calculate_all_stats(&dummy)?;

    let mut dice = match seed {
        Some(seed) => DiceRoller::seeded(seed),
        None => DiceRoller::from_entropy(),
    };

    let outcome = resolve_attack(&attacker.final_stats, &defender.final_stats, &mut dice);
    println!(
        "{} attacks the training dummy: d20={} total={} vs avoidance {:.0}",
        character.name, outcome.accuracy.roll, outcome.accuracy.total, defender.final_stats.avoidance
    );
    if outcome.hit {
        println!(
            "Hit! {} on the dice, {:.1} total damage, {:.1} past durability",
            outcome.damage_roll, outcome.damage_total, outcome.damage_dealt
        );
        if let Some(survival) = outcome.survival {
            println!(
                "Overkill — survival check d20={} vs DC {}: {}{}",
                survival.roll,
                survival.dc,
                if survival.survived { "survived" } else { "down" },
                if survival.catastrophic { " (catastrophic)" } else { "" }
            );
        }
    } else {
        println!("Miss.");
    }
    Ok(())
}
