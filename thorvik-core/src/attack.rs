//! Weapon and spell attack workflows.
//!
//! An attack is a d20 check plus the derived attack bonus, followed by a
//! damage roll. A natural 20 on the attack die doubles the damage dice.

use crate::bonus::{attack_bonus, damage_bonus, spell_attack_bonus};
use crate::character::CharacterProfile;
use crate::dice::{DiceError, DiceExpression, DiceSource, RollOutcome, RollPolicy};
use crate::history::{RollRecord, RollType};
use crate::items::{SpellProfile, WeaponProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Caller choices for an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackOptions {
    pub advantage: bool,
    pub disadvantage: bool,
    /// Use the versatile damage dice, when the weapon has them.
    pub two_handed: bool,
}

impl AttackOptions {
    pub fn with_advantage(mut self) -> Self {
        self.advantage = true;
        self
    }

    pub fn with_disadvantage(mut self) -> Self {
        self.disadvantage = true;
        self
    }

    pub fn two_handed(mut self) -> Self {
        self.two_handed = true;
        self
    }

    fn attack_policy(&self) -> RollPolicy {
        RollPolicy {
            advantage: self.advantage,
            disadvantage: self.disadvantage,
            critical: false,
        }
    }
}

/// Result of one attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub roll_type: RollType,
    pub source: String,
    pub attack: RollOutcome,
    pub attack_bonus: i32,
    /// Face shown by the attack d20.
    pub natural_roll: u32,
    pub is_critical: bool,
    pub damage: Option<RollOutcome>,
    pub damage_bonus: i32,
}

impl AttackOutcome {
    pub fn attack_total(&self) -> i64 {
        self.attack.total
    }

    /// Damage rolled plus the damage bonus, if the attack deals damage.
    pub fn damage_total(&self) -> Option<i64> {
        self.damage
            .as_ref()
            .map(|d| d.total + i64::from(self.damage_bonus))
    }

    /// Check the attack against an armor class. Natural 20 always hits.
    pub fn hits(&self, armor_class: i64) -> bool {
        self.is_critical || (self.natural_roll != 1 && self.attack.total >= armor_class)
    }

    /// One line summary, e.g. `Attack Roll: 17 (d20 roll: 14 +3) Damage: 6 (4 +2)`.
    pub fn summary(&self) -> String {
        let label = match self.roll_type {
            RollType::SpellAttack => "Spell Attack Roll",
            _ => "Attack Roll",
        };
        let mut text = format!(
            "{label}: {} (d20 roll: {} {:+})",
            self.attack.total, self.natural_roll, self.attack_bonus
        );
        if self.is_critical {
            text.push_str(" CRITICAL HIT!");
        }
        if let (Some(damage), Some(total)) = (&self.damage, self.damage_total()) {
            let faces = damage
                .individual_results
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(" + ");
            let extra = i64::from(damage.modifier) + i64::from(self.damage_bonus);
            if extra != 0 {
                text.push_str(&format!(" Damage: {total} ({faces} {extra:+})"));
            } else {
                text.push_str(&format!(" Damage: {total} ({faces})"));
            }
        }
        text
    }

    /// Record for the roll history.
    pub fn to_record(&self, character: &CharacterProfile) -> RollRecord {
        let mut record = RollRecord::new(
            self.roll_type,
            self.attack.notation.clone(),
            self.attack.total,
        )
        .for_character(character.id)
        .with_source(self.source.clone());
        record.natural_roll = Some(self.natural_roll);
        record.modifiers = self.attack_bonus;
        record.is_critical = self.is_critical;
        record.damage = self.damage_total();
        record
    }
}

fn roll_attack_die<D: DiceSource + ?Sized>(
    bonus: i32,
    options: AttackOptions,
    dice: &mut D,
) -> Result<(RollOutcome, u32), DiceError> {
    let attack = DiceExpression::d20_check(bonus).execute_with(options.attack_policy(), dice)?;
    let natural = attack.d20_face().ok_or_else(|| {
        DiceError::InvalidExpression(format!("`{}` rolled no d20", attack.notation))
    })?;
    Ok((attack, natural))
}

fn roll_damage<D: DiceSource + ?Sized>(
    notation: &str,
    critical: bool,
    dice: &mut D,
) -> Result<RollOutcome, DiceError> {
    let expr = DiceExpression::parse(notation)?;
    expr.execute_with(RollPolicy::default().with_critical(critical), dice)
}

/// Attack with a weapon: d20 + attack bonus, then damage + damage bonus.
pub fn roll_weapon_attack<D: DiceSource + ?Sized>(
    character: &CharacterProfile,
    weapon: &WeaponProfile,
    options: AttackOptions,
    dice: &mut D,
) -> Result<AttackOutcome, DiceError> {
    let bonus = attack_bonus(character, weapon);
    let (attack, natural_roll) = roll_attack_die(bonus, options, dice)?;
    let is_critical = attack.is_critical_die;
    let damage = roll_damage(weapon.damage_dice_for(options.two_handed), is_critical, dice)?;

    debug!(
        character = %character.name,
        weapon = %weapon.name,
        bonus,
        natural_roll,
        is_critical,
        "weapon attack"
    );

    Ok(AttackOutcome {
        roll_type: RollType::Attack,
        source: weapon.name.clone(),
        attack,
        attack_bonus: bonus,
        natural_roll,
        is_critical,
        damage: Some(damage),
        damage_bonus: damage_bonus(character, weapon),
    })
}

/// Cast an attack spell: d20 + spell attack bonus, then the spell's damage.
///
/// Spell damage carries no ability bonus and is not doubled on a natural 20.
pub fn roll_spell_attack<D: DiceSource + ?Sized>(
    character: &CharacterProfile,
    spell: &SpellProfile,
    options: AttackOptions,
    dice: &mut D,
) -> Result<AttackOutcome, DiceError> {
    let bonus = spell_attack_bonus(character, spell);
    let (attack, natural_roll) = roll_attack_die(bonus, options, dice)?;
    let is_critical = attack.is_critical_die;
    let damage = spell
        .damage_dice
        .as_deref()
        .map(|notation| roll_damage(notation, false, dice))
        .transpose()?;

    debug!(
        character = %character.name,
        spell = %spell.name,
        bonus,
        natural_roll,
        is_critical,
        "spell attack"
    );

    Ok(AttackOutcome {
        roll_type: RollType::SpellAttack,
        source: spell.name.clone(),
        attack,
        attack_bonus: bonus,
        natural_roll,
        is_critical,
        damage,
        damage_bonus: 0,
    })
}
