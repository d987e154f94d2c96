//! End-to-end attack scenarios: character sheet + library item + roll
//! history, driven by scripted dice.

use thorvik_core::character::create_sample_wizard;
use thorvik_core::testing::ScriptedDice;
use thorvik_core::{
    attack_bonus, damage_bonus, get_spell, get_weapon, roll_spell_attack, roll_weapon_attack,
    Ability, AbilityScores, AttackOptions, CharacterProfile, Roller, RollerConfig, RollHistory,
    RollSink, RollType, WeaponProfile, WeaponProperty,
};

fn rogue() -> CharacterProfile {
    // DEX 16 (+3), STR 10 (+0)
    CharacterProfile::new("Vex", 1, AbilityScores::new(10, 16, 12, 10, 10, 14))
}

#[test]
fn test_finesse_weapon_selects_dexterity() {
    let rogue = rogue();
    let blade = WeaponProfile::new("Shortsword", "1d6", thorvik_core::items::WeaponDamageType::Piercing)
        .with_ability(Ability::Strength)
        .with_properties(vec![WeaponProperty::Finesse, WeaponProperty::Light]);

    assert_eq!(attack_bonus(&rogue, &blade), 3 + 2);
    assert_eq!(damage_bonus(&rogue, &blade), 3);
}

#[test]
fn test_attack_history_per_character() {
    let rogue = rogue();
    let wizard = create_sample_wizard("Elara");
    let dagger = get_weapon("Dagger").unwrap();
    let missile = get_spell("Magic Missile").unwrap();

    let mut history = RollHistory::new();

    let mut dice = ScriptedDice::new([9, 2]);
    let hit = roll_weapon_attack(&rogue, &dagger, AttackOptions::default(), &mut dice).unwrap();
    history.record(hit.to_record(&rogue));

    let mut dice = ScriptedDice::new([20, 3]);
    let crit = roll_spell_attack(&wizard, &missile, AttackOptions::default(), &mut dice).unwrap();
    history.record(crit.to_record(&wizard));

    let mut dice = ScriptedDice::new([14, 4]);
    let second = roll_weapon_attack(&rogue, &dagger, AttackOptions::default(), &mut dice).unwrap();
    history.record(second.to_record(&rogue));

    let rogue_rolls = history.for_character(rogue.id, 10);
    assert_eq!(rogue_rolls.len(), 2);
    assert_eq!(rogue_rolls[0].final_result, 14 + 5);
    assert_eq!(rogue_rolls[0].damage, Some(4 + 3));
    assert_eq!(rogue_rolls[1].final_result, 9 + 5);

    let wizard_rolls = history.for_character(wizard.id, 10);
    assert_eq!(wizard_rolls.len(), 1);
    let record = wizard_rolls[0];
    assert_eq!(record.roll_type, RollType::SpellAttack);
    assert!(record.is_critical);
    // 1d4+1 rolled once, no ability bonus on spell damage
    assert_eq!(record.damage, Some(3 + 1));
}

#[test]
fn test_roller_attacks_are_reproducible_with_seed() {
    let rogue = rogue();
    let dagger = get_weapon("Dagger").unwrap();
    let config = RollerConfig::new().with_seed(2024);

    let mut a = Roller::new(config.clone());
    let mut b = Roller::new(config);
    for _ in 0..25 {
        let x = a.weapon_attack(&rogue, &dagger, AttackOptions::default()).unwrap();
        let y = b.weapon_attack(&rogue, &dagger, AttackOptions::default()).unwrap();
        assert_eq!(x.attack_total(), y.attack_total());
        assert_eq!(x.damage_total(), y.damage_total());
        assert!((6..=25).contains(&x.attack_total()));
    }
    assert_eq!(a.history().len(), 25);
}

#[test]
fn test_spell_without_damage_records_no_damage() {
    let wizard = create_sample_wizard("Elara");
    let shield = get_spell("Shield").unwrap();
    let mut roller = Roller::new(RollerConfig::new().with_seed(5));
    let outcome = roller
        .spell_attack(&wizard, &shield, AttackOptions::default())
        .unwrap();
    assert!(outcome.damage.is_none());
    assert_eq!(roller.history().latest().unwrap().damage, None);
}
