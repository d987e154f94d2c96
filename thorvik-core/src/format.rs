//! Human readable roll summaries.

use crate::dice::{DiceError, RollOutcome};

/// Render a roll result, or the reason it failed.
pub fn format_result(result: &Result<RollOutcome, DiceError>) -> String {
    match result {
        Ok(outcome) => format_outcome(outcome),
        Err(e) => format_error(e),
    }
}

/// Render a failure with the error prefix.
pub fn format_error(error: &DiceError) -> String {
    format!("Error: {error}")
}

/// Render a successful roll, e.g. `Roll: 2d6+3 = 10 (4, 3 +3)`.
pub fn format_outcome(outcome: &RollOutcome) -> String {
    let mut text = format!("Roll: {} = {}", outcome.notation, outcome.total);

    if !outcome.individual_results.is_empty() {
        text.push_str(&format!(" ({}", join_faces(&outcome.individual_results)));
        if outcome.modifier != 0 {
            text.push_str(&format!(" {:+}", outcome.modifier));
        }
        text.push(')');
    }

    if outcome.policy.critical {
        text.push_str(" [CRITICAL HIT!]");
    }

    if let Some((first, second)) = &outcome.alternate_results {
        let label = outcome.advantage_applied().label();
        text.push_str(&format!(
            " [{label}] (Rolled {} and {})",
            join_faces(first),
            join_faces(second)
        ));
    }

    text
}

fn join_faces(faces: &[u32]) -> String {
    faces
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{DiceExpression, ParseFailure, RollPolicy};
    use crate::testing::ScriptedDice;

    fn roll(notation: &str, policy: RollPolicy, faces: &[u32]) -> RollOutcome {
        let mut dice = ScriptedDice::new(faces.iter().copied());
        DiceExpression::parse(notation)
            .unwrap()
            .execute_with(policy, &mut dice)
            .unwrap()
    }

    #[test]
    fn test_plain_roll() {
        let outcome = roll("2d6+3", RollPolicy::default(), &[4, 3]);
        assert_eq!(format_outcome(&outcome), "Roll: 2d6+3 = 10 (4, 3 +3)");
    }

    #[test]
    fn test_zero_modifier_is_omitted() {
        let outcome = roll("1d8", RollPolicy::default(), &[6]);
        assert_eq!(format_outcome(&outcome), "Roll: 1d8 = 6 (6)");
    }

    #[test]
    fn test_negative_modifier() {
        let outcome = roll("1d4-2", RollPolicy::default(), &[1]);
        assert_eq!(format_outcome(&outcome), "Roll: 1d4-2 = -1 (1 -2)");
    }

    #[test]
    fn test_critical_marker() {
        let outcome = roll("1d6", RollPolicy::default().with_critical(true), &[2, 5]);
        assert_eq!(
            format_outcome(&outcome),
            "Roll: 1d6 = 7 (2, 5) [CRITICAL HIT!]"
        );
    }

    #[test]
    fn test_advantage_marker_lists_both_sets() {
        let outcome = roll("1d20", RollPolicy::default().with_advantage(), &[3, 15]);
        assert_eq!(
            format_outcome(&outcome),
            "Roll: 1d20 = 15 (15) [Advantage] (Rolled 3 and 15)"
        );

        let outcome = roll("1d20", RollPolicy::default().with_disadvantage(), &[3, 15]);
        assert_eq!(
            format_outcome(&outcome),
            "Roll: 1d20 = 3 (3) [Disadvantage] (Rolled 3 and 15)"
        );
    }

    #[test]
    fn test_cancelled_advantage_has_no_marker() {
        let policy = RollPolicy::default().with_advantage().with_disadvantage();
        let outcome = roll("1d20", policy, &[11]);
        assert_eq!(format_outcome(&outcome), "Roll: 1d20 = 11 (11)");
    }

    #[test]
    fn test_error_prefix() {
        let result = Err(DiceError::Parse(ParseFailure::Empty));
        assert_eq!(
            format_result(&result),
            "Error: Invalid dice notation: notation is empty"
        );
    }
}
