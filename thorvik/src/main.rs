//! Thorvik terminal roller.
//!
//! Rolls dice notation, quick dice and library weapon/spell attacks against a
//! character sheet given on the command line:
//!
//! ```bash
//! cargo run -p thorvik -- roll "2d6+1d4+5" --advantage
//! cargo run -p thorvik -- attack dagger --dex 16 --level 5
//! cargo run -p thorvik -- shell --str 16 --dex 14
//! ```

mod cli;
mod shell;

use anyhow::{bail, Result};
use clap::Parser;
use thorvik_core::items::{SPELLS, WEAPONS};
use thorvik_core::{format_outcome, get_spell, get_weapon, AttackOutcome, RollOutcome, Roller};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thorvik=info,thorvik_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut roller = Roller::new(cli.roller_config());
    tracing::debug!(seed = ?cli.seed, "roller ready");

    match cli.command {
        Command::Roll {
            ref notation,
            policy,
        } => {
            let outcome = roller.roll(notation, policy.into())?;
            print_roll(&outcome, cli.json)?;
        }
        Command::Quick { die, policy } => {
            let outcome = roller.quick_roll(die, policy.into())?;
            print_roll(&outcome, cli.json)?;
        }
        Command::Attack {
            ref weapon,
            ref sheet,
            magical_bonus,
            two_handed,
            advantage,
        } => {
            let Some(template) = get_weapon(weapon) else {
                bail!("unknown weapon `{weapon}`");
            };
            let weapon = template.with_magical_bonus(magical_bonus);
            let character = sheet.to_profile();
            let outcome =
                roller.weapon_attack(&character, &weapon, advantage.attack_options(two_handed))?;
            print_attack(&outcome, cli.json)?;
        }
        Command::Cast {
            ref spell,
            ref sheet,
            advantage,
        } => {
            let Some(spell) = get_spell(spell) else {
                bail!("unknown spell `{spell}`");
            };
            let character = sheet.to_profile();
            let outcome =
                roller.spell_attack(&character, &spell, advantage.attack_options(false))?;
            print_attack(&outcome, cli.json)?;
        }
        Command::Library => print_library(cli.json)?,
        Command::Shell { ref sheet } => {
            shell::run_shell(roller, sheet.to_profile())?;
        }
    }

    Ok(())
}

fn print_roll(outcome: &RollOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{}", format_outcome(outcome));
    }
    Ok(())
}

fn print_attack(outcome: &AttackOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{}", outcome.summary());
    }
    Ok(())
}

fn print_library(json: bool) -> Result<()> {
    if json {
        let library = serde_json::json!({
            "weapons": &*WEAPONS,
            "spells": &*SPELLS,
        });
        println!("{}", serde_json::to_string_pretty(&library)?);
        return Ok(());
    }

    println!("Weapons:");
    for weapon in WEAPONS.iter() {
        let properties = weapon
            .properties
            .iter()
            .map(|p| p.tag())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {:<12} {:<5} {:<11} {} [{}]",
            weapon.name,
            weapon.damage_dice,
            weapon.damage_type.name(),
            weapon.ability,
            properties
        );
    }
    println!("Spells:");
    for spell in SPELLS.iter() {
        println!(
            "  {:<14} level {} {:<12} {}",
            spell.name,
            spell.level,
            spell.school.name(),
            spell.damage_dice.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
