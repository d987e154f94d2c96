//! Property checks for parsing and rolling over many seeded trials.
//!
//! Run with: `cargo test -p thorvik-core --test roll_properties`

use rand::rngs::StdRng;
use rand::SeedableRng;
use thorvik_core::testing::assert_outcome_consistent;
use thorvik_core::{parse, DiceError, DiceExpression, DiceGroup, ParseFailure, RollPolicy};

const TRIALS: usize = 2000;

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x7407_71c)
}

#[test]
fn test_single_group_rolls_n_dice_in_range() {
    let mut rng = rng();
    for (count, sides) in [(1, 4), (3, 6), (2, 20), (10, 100), (1, 1)] {
        let expr = parse(&format!("{count}d{sides}")).unwrap();
        for _ in 0..200 {
            let outcome = expr.execute_with(RollPolicy::default(), &mut rng).unwrap();
            assert_eq!(outcome.individual_results.len(), count as usize);
            assert!(outcome
                .individual_results
                .iter()
                .all(|&face| face >= 1 && face <= sides));
            assert_outcome_consistent(&outcome);
        }
    }
}

#[test]
fn test_compound_total_is_dice_plus_signed_modifier() {
    let mut rng = rng();
    for (notation, dice, modifier) in [("2d6+1d4+5", 3, 5), ("3d8+2d10-4", 5, -4), ("1d12-1+3", 1, 2)] {
        let expr = parse(notation).unwrap();
        for _ in 0..200 {
            let outcome = expr.execute_with(RollPolicy::default(), &mut rng).unwrap();
            assert_eq!(outcome.individual_results.len(), dice);
            assert_eq!(outcome.modifier, modifier);
            let sum: i64 = outcome.individual_results.iter().map(|&f| i64::from(f)).sum();
            assert_eq!(outcome.total, sum + i64::from(modifier));
        }
    }
}

#[test]
fn test_round_trip_scenario() {
    let expr = parse("2d6+1d4+5").unwrap();
    assert_eq!(expr.groups, vec![DiceGroup::new(2, 6), DiceGroup::new(1, 4)]);
    assert_eq!(expr.modifier, 5);
    assert_eq!(expr.dice_count(), 3);

    let mut rng = rng();
    let outcome = expr.execute_with(RollPolicy::default(), &mut rng).unwrap();
    assert_eq!(outcome.individual_results.len(), 3);
    assert!(outcome.individual_results[..2].iter().all(|&f| (1..=6).contains(&f)));
    assert!((1..=4).contains(&outcome.individual_results[2]));
    let sum: i64 = outcome.individual_results.iter().map(|&f| i64::from(f)).sum();
    assert_eq!(outcome.total, sum + 5);
}

#[test]
fn test_critical_always_rolls_double() {
    let mut rng = rng();
    let expr = parse("1d6").unwrap();
    for _ in 0..200 {
        let outcome = expr
            .execute_with(RollPolicy::default().with_critical(true), &mut rng)
            .unwrap();
        assert_eq!(outcome.individual_results.len(), 2);
    }

    let expr = parse("2d6+1d8+2").unwrap();
    let outcome = expr
        .execute_with(RollPolicy::default().with_critical(true), &mut rng)
        .unwrap();
    assert_eq!(outcome.individual_results.len(), 6);
    assert_eq!(outcome.modifier, 2);
}

fn sum(faces: &[u32]) -> i64 {
    faces.iter().map(|&f| i64::from(f)).sum()
}

#[test]
fn test_advantage_never_keeps_the_lower_set() {
    let mut rng = rng();
    let expr = parse("2d6").unwrap();
    for _ in 0..TRIALS {
        let outcome = expr
            .execute_with(RollPolicy::default().with_advantage(), &mut rng)
            .unwrap();
        let (first, second) = outcome.alternate_results.clone().unwrap();
        assert_eq!(outcome.dice_sum, sum(&first).max(sum(&second)));
        assert_outcome_consistent(&outcome);
    }
}

#[test]
fn test_disadvantage_never_keeps_the_higher_set() {
    let mut rng = rng();
    let expr = parse("1d20+2").unwrap();
    for _ in 0..TRIALS {
        let outcome = expr
            .execute_with(RollPolicy::default().with_disadvantage(), &mut rng)
            .unwrap();
        let (first, second) = outcome.alternate_results.clone().unwrap();
        assert_eq!(outcome.dice_sum, sum(&first).min(sum(&second)));
    }
}

#[test]
fn test_both_flags_degenerate_to_single_draw() {
    let mut rng = rng();
    let expr = parse("1d20").unwrap();
    let policy = RollPolicy::default().with_advantage().with_disadvantage();
    for _ in 0..200 {
        let outcome = expr.execute_with(policy, &mut rng).unwrap();
        assert!(outcome.alternate_results.is_none());
        assert_eq!(outcome.individual_results.len(), 1);
    }
}

#[test]
fn test_faces_are_roughly_uniform() {
    let mut rng = rng();
    let expr = parse("1d6").unwrap();
    let rolls = 60_000;
    let mut counts = [0usize; 6];
    for _ in 0..rolls {
        let outcome = expr.execute_with(RollPolicy::default(), &mut rng).unwrap();
        counts[outcome.individual_results[0] as usize - 1] += 1;
    }
    // Expect 10_000 per face; allow a generous 5% band.
    for (face, &count) in counts.iter().enumerate() {
        assert!(
            (9_500..=10_500).contains(&count),
            "face {} came up {count} times",
            face + 1
        );
    }
}

#[test]
fn test_parser_rejections_are_values_not_panics() {
    for bad in ["", "d20", "1d", "abc", "0d6"] {
        let result = DiceExpression::parse(bad);
        assert!(result.is_err(), "`{bad}` should not parse");
    }
    assert_eq!(parse(""), Err(ParseFailure::Empty));
    assert!(matches!(
        thorvik_core::roll("0d6", RollPolicy::default()),
        Err(DiceError::Parse(ParseFailure::NonPositiveCount(_)))
    ));
}
