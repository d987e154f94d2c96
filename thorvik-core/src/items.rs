//! Weapon and spell attack profiles, plus the shared template library.
//!
//! Templates are what a new character picks from; the storage layer copies
//! them per character and may attach a magical or override bonus.

use crate::character::Ability;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weapon property `{0}`")]
pub struct UnknownProperty(pub String);

// ============================================================================
// Weapons
// ============================================================================

/// Weapon damage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponDamageType {
    Slashing,
    Piercing,
    Bludgeoning,
}

impl WeaponDamageType {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponDamageType::Slashing => "slashing",
            WeaponDamageType::Piercing => "piercing",
            WeaponDamageType::Bludgeoning => "bludgeoning",
        }
    }
}

/// Weapon property tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponProperty {
    Finesse,
    Light,
    Heavy,
    TwoHanded,
    Versatile,
    Thrown,
    Ammunition,
    Loading,
    Reach,
}

impl WeaponProperty {
    pub fn tag(&self) -> &'static str {
        match self {
            WeaponProperty::Finesse => "finesse",
            WeaponProperty::Light => "light",
            WeaponProperty::Heavy => "heavy",
            WeaponProperty::TwoHanded => "two-handed",
            WeaponProperty::Versatile => "versatile",
            WeaponProperty::Thrown => "thrown",
            WeaponProperty::Ammunition => "ammunition",
            WeaponProperty::Loading => "loading",
            WeaponProperty::Reach => "reach",
        }
    }
}

impl fmt::Display for WeaponProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for WeaponProperty {
    type Err = UnknownProperty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase().replace(['_', ' '], "-");
        let property = match tag.as_str() {
            "finesse" => WeaponProperty::Finesse,
            "light" => WeaponProperty::Light,
            "heavy" => WeaponProperty::Heavy,
            "two-handed" | "twohanded" => WeaponProperty::TwoHanded,
            "versatile" => WeaponProperty::Versatile,
            "thrown" => WeaponProperty::Thrown,
            "ammunition" => WeaponProperty::Ammunition,
            "loading" => WeaponProperty::Loading,
            "reach" => WeaponProperty::Reach,
            _ => return Err(UnknownProperty(s.to_string())),
        };
        Ok(property)
    }
}

/// A weapon as attached to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub name: String,
    pub damage_dice: String,
    pub damage_type: WeaponDamageType,
    /// Ability used for the attack roll.
    pub ability: Ability,
    pub properties: Vec<WeaponProperty>,
    /// Damage dice when wielded two-handed (versatile weapons).
    pub versatile_dice: Option<String>,
    pub magical_bonus: i32,
    /// Per-character adjustment to the attack bonus.
    pub bonus_override: i32,
}

impl WeaponProfile {
    pub fn new(
        name: impl Into<String>,
        damage_dice: impl Into<String>,
        damage_type: WeaponDamageType,
    ) -> Self {
        Self {
            name: name.into(),
            damage_dice: damage_dice.into(),
            damage_type,
            ability: Ability::Strength,
            properties: Vec::new(),
            versatile_dice: None,
            magical_bonus: 0,
            bonus_override: 0,
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = ability;
        self
    }

    pub fn with_properties(mut self, properties: Vec<WeaponProperty>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_versatile_dice(mut self, dice: impl Into<String>) -> Self {
        self.versatile_dice = Some(dice.into());
        if !self.properties.contains(&WeaponProperty::Versatile) {
            self.properties.push(WeaponProperty::Versatile);
        }
        self
    }

    pub fn with_magical_bonus(mut self, bonus: i32) -> Self {
        self.magical_bonus = bonus;
        self
    }

    pub fn with_bonus_override(mut self, bonus: i32) -> Self {
        self.bonus_override = bonus;
        self
    }

    pub fn is_finesse(&self) -> bool {
        self.properties.contains(&WeaponProperty::Finesse)
    }

    /// Damage notation for the requested grip.
    pub fn damage_dice_for(&self, two_handed: bool) -> &str {
        match (&self.versatile_dice, two_handed) {
            (Some(dice), true) => dice,
            _ => &self.damage_dice,
        }
    }
}

// ============================================================================
// Spells
// ============================================================================

/// Schools of magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellSchool {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

impl SpellSchool {
    pub fn name(&self) -> &'static str {
        match self {
            SpellSchool::Abjuration => "Abjuration",
            SpellSchool::Conjuration => "Conjuration",
            SpellSchool::Divination => "Divination",
            SpellSchool::Enchantment => "Enchantment",
            SpellSchool::Evocation => "Evocation",
            SpellSchool::Illusion => "Illusion",
            SpellSchool::Necromancy => "Necromancy",
            SpellSchool::Transmutation => "Transmutation",
        }
    }
}

/// How a spell reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellAttackType {
    /// Spell attack roll against AC.
    Attack,
    /// Target makes a saving throw.
    Save(Ability),
    AutoHit,
    None,
}

/// A spell as attached to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellProfile {
    pub name: String,
    pub level: u8,
    pub school: SpellSchool,
    pub attack_type: SpellAttackType,
    pub damage_dice: Option<String>,
    pub damage_type: Option<String>,
    /// Overrides the caster's spellcasting ability when set.
    pub ability: Option<Ability>,
    pub attack_bonus_override: i32,
}

impl SpellProfile {
    pub fn new(
        name: impl Into<String>,
        level: u8,
        school: SpellSchool,
        attack_type: SpellAttackType,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            school,
            attack_type,
            damage_dice: None,
            damage_type: None,
            ability: None,
            attack_bonus_override: 0,
        }
    }

    pub fn with_damage(mut self, dice: impl Into<String>, damage_type: impl Into<String>) -> Self {
        self.damage_dice = Some(dice.into());
        self.damage_type = Some(damage_type.into());
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_attack_bonus_override(mut self, bonus: i32) -> Self {
        self.attack_bonus_override = bonus;
        self
    }
}

// ============================================================================
// Template library
// ============================================================================

/// Weapon templates every character can pick from.
pub static WEAPONS: LazyLock<Vec<WeaponProfile>> = LazyLock::new(|| {
    vec![
        WeaponProfile::new("Longsword", "1d8", WeaponDamageType::Slashing)
            .with_versatile_dice("1d10"),
        WeaponProfile::new("Shortbow", "1d6", WeaponDamageType::Piercing)
            .with_ability(Ability::Dexterity)
            .with_properties(vec![WeaponProperty::Ammunition, WeaponProperty::TwoHanded]),
        WeaponProfile::new("Dagger", "1d4", WeaponDamageType::Piercing)
            .with_ability(Ability::Dexterity)
            .with_properties(vec![
                WeaponProperty::Finesse,
                WeaponProperty::Light,
                WeaponProperty::Thrown,
            ]),
    ]
});

/// Spell templates every character can pick from.
pub static SPELLS: LazyLock<Vec<SpellProfile>> = LazyLock::new(|| {
    vec![
        SpellProfile::new(
            "Fireball",
            3,
            SpellSchool::Evocation,
            SpellAttackType::Save(Ability::Dexterity),
        )
        .with_damage("8d6", "fire"),
        SpellProfile::new(
            "Magic Missile",
            1,
            SpellSchool::Evocation,
            SpellAttackType::AutoHit,
        )
        .with_damage("1d4+1", "force"),
        SpellProfile::new("Shield", 1, SpellSchool::Abjuration, SpellAttackType::None),
    ]
});

/// Get a weapon template by name (case insensitive).
pub fn get_weapon(name: &str) -> Option<WeaponProfile> {
    WEAPONS
        .iter()
        .find(|w| w.name.eq_ignore_ascii_case(name.trim()))
        .cloned()
}

/// Get a spell template by name (case insensitive).
pub fn get_spell(name: &str) -> Option<SpellProfile> {
    SPELLS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::DiceExpression;

    #[test]
    fn test_get_weapon() {
        let longsword = get_weapon("Longsword").unwrap();
        assert_eq!(longsword.damage_dice, "1d8");
        assert_eq!(longsword.damage_dice_for(true), "1d10");
        assert_eq!(longsword.damage_dice_for(false), "1d8");

        // Case insensitive
        let dagger = get_weapon("dagger").unwrap();
        assert!(dagger.is_finesse());
        assert_eq!(dagger.ability, Ability::Dexterity);

        assert!(get_weapon("Vorpal Spoon").is_none());
    }

    #[test]
    fn test_non_versatile_ignores_two_handed_grip() {
        let shortbow = get_weapon("shortbow").unwrap();
        assert_eq!(shortbow.damage_dice_for(true), "1d6");
    }

    #[test]
    fn test_get_spell() {
        let fireball = get_spell("fireball").unwrap();
        assert_eq!(fireball.damage_dice.as_deref(), Some("8d6"));
        assert_eq!(
            fireball.attack_type,
            SpellAttackType::Save(Ability::Dexterity)
        );

        let shield = get_spell("Shield").unwrap();
        assert!(shield.damage_dice.is_none());
    }

    #[test]
    fn test_library_dice_all_parse() {
        for weapon in WEAPONS.iter() {
            assert!(DiceExpression::parse(&weapon.damage_dice).is_ok(), "{}", weapon.name);
        }
        for dice in SPELLS.iter().filter_map(|s| s.damage_dice.as_deref()) {
            assert!(DiceExpression::parse(dice).is_ok(), "{dice}");
        }
    }

    #[test]
    fn test_property_tags() {
        assert_eq!("finesse".parse::<WeaponProperty>(), Ok(WeaponProperty::Finesse));
        assert_eq!(
            "Two-Handed".parse::<WeaponProperty>(),
            Ok(WeaponProperty::TwoHanded)
        );
        assert!("spiky".parse::<WeaponProperty>().is_err());
        assert_eq!(WeaponProperty::TwoHanded.to_string(), "two-handed");
    }
}
