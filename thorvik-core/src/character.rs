//! Character sheet data consumed by the bonus calculator.
//!
//! Characters are owned by the storage layer; the core only reads their
//! ability scores, level and spellcasting ability.

use crate::bonus::ability_modifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ability `{0}`")]
pub struct UnknownAbility(pub String);

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for Ability {
    type Err = UnknownAbility;

    /// Accepts either the abbreviation (`"STR"`) or the full name, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Ability::all()
            .into_iter()
            .find(|a| {
                a.abbreviation().eq_ignore_ascii_case(key) || a.name().eq_ignore_ascii_case(key)
            })
            .ok_or_else(|| UnknownAbility(s.to_string()))
    }
}

/// Ability scores container.
///
/// Scores are plain integers: values outside 1-30 are unusual but legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.get(ability))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Character Profile
// ============================================================================

/// The slice of a character the roll math needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: CharacterId,
    pub name: String,
    pub level: u32,
    pub ability_scores: AbilityScores,
    /// Ability used for spell attacks; Intelligence when unset.
    pub spellcasting_ability: Option<Ability>,
}

impl CharacterProfile {
    pub fn new(name: impl Into<String>, level: u32, ability_scores: AbilityScores) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            level,
            ability_scores,
            spellcasting_ability: None,
        }
    }

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_spellcasting_ability(mut self, ability: Ability) -> Self {
        self.spellcasting_ability = Some(ability);
        self
    }

    pub fn spellcasting_ability(&self) -> Ability {
        self.spellcasting_ability.unwrap_or(Ability::Intelligence)
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.ability_scores.modifier(ability)
    }
}

/// Create a sample fighter for testing and demos.
pub fn create_sample_fighter(name: &str) -> CharacterProfile {
    CharacterProfile::new(name, 1, AbilityScores::new(16, 14, 15, 10, 12, 8))
}

/// Create a sample wizard for testing and demos.
pub fn create_sample_wizard(name: &str) -> CharacterProfile {
    CharacterProfile::new(name, 5, AbilityScores::new(8, 14, 13, 16, 12, 10))
        .with_spellcasting_ability(Ability::Intelligence)
}
