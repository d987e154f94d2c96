//! Command line arguments.

use clap::{Args, Parser, Subcommand};
use thorvik_core::{Ability, AbilityScores, AttackOptions, CharacterProfile, DieType, RollPolicy, RollerConfig};

#[derive(Debug, Parser)]
#[command(name = "thorvik", version, about = "Dice roller and attack calculator")]
pub struct Cli {
    /// Seed for reproducible rolls.
    #[arg(long, global = true, env = "THORVIK_SEED")]
    pub seed: Option<u64>,

    /// Number of rolls kept in the session history.
    #[arg(long, global = true, env = "THORVIK_HISTORY_LIMIT", default_value_t = 50)]
    pub history_limit: usize,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn roller_config(&self) -> RollerConfig {
        let config = RollerConfig::new().with_history_limit(self.history_limit);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Roll a dice expression, e.g. `2d6+1d4+5`.
    Roll {
        notation: String,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Roll a single standard die (d4, d6, d8, d10, d12, d20, d100).
    Quick {
        die: DieType,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Attack with a weapon from the library.
    Attack {
        weapon: String,
        #[command(flatten)]
        sheet: SheetArgs,
        /// Magical bonus of this copy of the weapon.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        magical_bonus: i32,
        /// Wield a versatile weapon with both hands.
        #[arg(long)]
        two_handed: bool,
        #[command(flatten)]
        advantage: AdvantageArgs,
    },
    /// Make a spell attack with a spell from the library.
    Cast {
        spell: String,
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        advantage: AdvantageArgs,
    },
    /// List the weapon and spell templates.
    Library,
    /// Read commands from stdin, one per line.
    Shell {
        #[command(flatten)]
        sheet: SheetArgs,
    },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct AdvantageArgs {
    #[arg(long)]
    pub advantage: bool,
    #[arg(long)]
    pub disadvantage: bool,
}

impl AdvantageArgs {
    pub fn attack_options(&self, two_handed: bool) -> AttackOptions {
        AttackOptions {
            advantage: self.advantage,
            disadvantage: self.disadvantage,
            two_handed,
        }
    }
}

#[derive(Debug, Clone, Copy, Args)]
pub struct PolicyArgs {
    #[command(flatten)]
    pub advantage: AdvantageArgs,
    /// Double every die (critical hit damage).
    #[arg(long)]
    pub critical: bool,
}

impl From<PolicyArgs> for RollPolicy {
    fn from(args: PolicyArgs) -> Self {
        RollPolicy {
            advantage: args.advantage.advantage,
            disadvantage: args.advantage.disadvantage,
            critical: args.critical,
        }
    }
}

/// Character sheet given on the command line.
#[derive(Debug, Clone, Args)]
pub struct SheetArgs {
    #[arg(long, default_value = "Adventurer")]
    pub name: String,
    #[arg(long, default_value_t = 1)]
    pub level: u32,
    #[arg(long = "str", default_value_t = 10, allow_negative_numbers = true)]
    pub strength: i32,
    #[arg(long = "dex", default_value_t = 10, allow_negative_numbers = true)]
    pub dexterity: i32,
    #[arg(long = "con", default_value_t = 10, allow_negative_numbers = true)]
    pub constitution: i32,
    #[arg(long = "int", default_value_t = 10, allow_negative_numbers = true)]
    pub intelligence: i32,
    #[arg(long = "wis", default_value_t = 10, allow_negative_numbers = true)]
    pub wisdom: i32,
    #[arg(long = "cha", default_value_t = 10, allow_negative_numbers = true)]
    pub charisma: i32,
    /// Spellcasting ability (STR, DEX, CON, INT, WIS, CHA).
    #[arg(long)]
    pub spellcasting: Option<Ability>,
}

impl SheetArgs {
    pub fn to_profile(&self) -> CharacterProfile {
        let scores = AbilityScores::new(
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
        );
        let profile = CharacterProfile::new(self.name.clone(), self.level, scores);
        match self.spellcasting {
            Some(ability) => profile.with_spellcasting_ability(ability),
            None => profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_roll_args() {
        let cli = Cli::try_parse_from(["thorvik", "roll", "2d6+3", "--advantage", "--seed", "9"])
            .unwrap();
        assert_eq!(cli.seed, Some(9));
        match cli.command {
            Command::Roll { notation, policy } => {
                assert_eq!(notation, "2d6+3");
                let policy = RollPolicy::from(policy);
                assert!(policy.advantage && !policy.disadvantage && !policy.critical);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_attack_sheet_args() {
        let cli = Cli::try_parse_from([
            "thorvik", "attack", "dagger", "--dex", "16", "--level", "5", "--magical-bonus", "1",
        ])
        .unwrap();
        match cli.command {
            Command::Attack {
                weapon,
                sheet,
                magical_bonus,
                ..
            } => {
                assert_eq!(weapon, "dagger");
                assert_eq!(magical_bonus, 1);
                let profile = sheet.to_profile();
                assert_eq!(profile.level, 5);
                assert_eq!(profile.modifier(Ability::Dexterity), 3);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_quick_rejects_unknown_die() {
        assert!(Cli::try_parse_from(["thorvik", "quick", "d7"]).is_err());
        assert!(Cli::try_parse_from(["thorvik", "quick", "d20", "--critical"]).is_ok());
    }
}
