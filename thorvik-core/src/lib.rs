//! Dice rolling and attack math for the Thorvik attack roller.
//!
//! This crate provides:
//! - Dice notation parsing (`2d6+1d4+5`) and roll execution with
//!   advantage, disadvantage and critical policies
//! - Ability, proficiency, attack and damage bonus derivation
//! - Weapon and spell attack workflows with a pluggable roll history sink
//! - Human readable roll summaries
//!
//! # Quick Start
//!
//! ```
//! use thorvik_core::{format_result, roll, RollPolicy};
//!
//! let result = roll("2d6+3", RollPolicy::default().with_advantage());
//! println!("{}", format_result(&result));
//! ```

pub mod attack;
pub mod bonus;
pub mod character;
pub mod dice;
pub mod format;
pub mod history;
pub mod items;
pub mod roller;
pub mod testing;

// Primary public API
pub use attack::{roll_spell_attack, roll_weapon_attack, AttackOptions, AttackOutcome};
pub use bonus::{
    ability_modifier, attack_bonus, damage_bonus, proficiency_bonus, spell_attack_bonus,
    AttackProfile,
};
pub use character::{Ability, AbilityScores, CharacterId, CharacterProfile};
pub use dice::{
    execute, parse, roll, Advantage, DiceError, DiceExpression, DiceGroup, DiceSource, DieType,
    ParseFailure, RollOutcome, RollPolicy,
};
pub use format::{format_error, format_outcome, format_result};
pub use history::{RollHistory, RollRecord, RollSink, RollType};
pub use items::{get_spell, get_weapon, SpellProfile, WeaponProfile, WeaponProperty};
pub use roller::{Roller, RollerConfig};
