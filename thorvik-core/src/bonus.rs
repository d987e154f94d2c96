//! Bonus derivation for attack and damage rolls.
//!
//! Attack bonuses include proficiency; damage bonuses do not. Callers pick
//! the formula that matches the roll they are making.

use crate::character::{Ability, CharacterProfile};
use crate::items::{SpellProfile, WeaponProfile};

/// Ability modifier for a score, using floor division so that odd negative
/// offsets round down (score 7 is -2, not -1).
pub fn ability_modifier(score: i32) -> i32 {
    score.div_euclid(2) - 5
}

/// Proficiency bonus for a character level.
///
/// One plus a quarter of the level, never below the level 1 bonus of +2.
pub fn proficiency_bonus(level: u32) -> i32 {
    // level / 4 always fits in an i32
    (1 + (level / 4) as i32).max(2)
}

/// Something a character can attack with.
pub trait AttackProfile {
    /// Ability the attack roll is based on for this character.
    fn attack_ability(&self, character: &CharacterProfile) -> Ability;

    /// Whether dexterity may replace the attack ability when higher.
    fn is_finesse(&self) -> bool {
        false
    }

    fn magical_bonus(&self) -> i32 {
        0
    }

    fn override_bonus(&self) -> i32 {
        0
    }
}

impl AttackProfile for WeaponProfile {
    fn attack_ability(&self, _character: &CharacterProfile) -> Ability {
        self.ability
    }

    fn is_finesse(&self) -> bool {
        WeaponProfile::is_finesse(self)
    }

    fn magical_bonus(&self) -> i32 {
        self.magical_bonus
    }

    fn override_bonus(&self) -> i32 {
        self.bonus_override
    }
}

impl AttackProfile for SpellProfile {
    fn attack_ability(&self, character: &CharacterProfile) -> Ability {
        self.ability
            .unwrap_or_else(|| character.spellcasting_ability())
    }

    fn override_bonus(&self) -> i32 {
        self.attack_bonus_override
    }
}

/// Ability modifier the item uses, taking finesse into account.
pub fn attack_ability_modifier<A: AttackProfile + ?Sized>(
    character: &CharacterProfile,
    item: &A,
) -> i32 {
    let named = character.modifier(item.attack_ability(character));
    if item.is_finesse() {
        named.max(character.modifier(Ability::Dexterity))
    } else {
        named
    }
}

/// Attack bonus: ability modifier + proficiency + magical bonus + override.
pub fn attack_bonus<A: AttackProfile + ?Sized>(character: &CharacterProfile, item: &A) -> i32 {
    attack_ability_modifier(character, item)
        + proficiency_bonus(character.level)
        + item.magical_bonus()
        + item.override_bonus()
}

/// Damage bonus: ability modifier + magical bonus. No proficiency.
pub fn damage_bonus<A: AttackProfile + ?Sized>(character: &CharacterProfile, item: &A) -> i32 {
    attack_ability_modifier(character, item) + item.magical_bonus()
}

/// Spell attack bonus for the character's spellcasting ability.
pub fn spell_attack_bonus(character: &CharacterProfile, spell: &SpellProfile) -> i32 {
    attack_bonus(character, spell)
}
