//! Testing utilities.
//!
//! `ScriptedDice` stands in for a random generator so that roll outcomes,
//! attack workflows and formatting can be asserted exactly.

use crate::dice::{DiceSource, RollOutcome};
use std::collections::VecDeque;

/// A dice source that returns preset faces in order.
///
/// Panics when a face does not fit the die being rolled or when the script
/// runs out, so a test never silently rolls something it did not intend.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
    rolled: Vec<(u32, u32)>,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            rolled: Vec::new(),
        }
    }

    /// Queue more faces after the current script.
    pub fn push(&mut self, face: u32) {
        self.faces.push_back(face);
    }

    pub fn is_exhausted(&self) -> bool {
        self.faces.is_empty()
    }

    /// Every `(sides, face)` pair handed out so far.
    pub fn rolled(&self) -> &[(u32, u32)] {
        &self.rolled
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let face = self
            .faces
            .pop_front()
            .unwrap_or_else(|| panic!("scripted dice exhausted rolling a d{sides}"));
        assert!(
            (1..=sides).contains(&face),
            "scripted face {face} does not fit a d{sides}"
        );
        self.rolled.push((sides, face));
        face
    }
}

/// Assert the arithmetic invariants every outcome must satisfy.
pub fn assert_outcome_consistent(outcome: &RollOutcome) {
    let expected_dice: u32 = outcome.groups.iter().map(|g| g.count).sum();
    assert_eq!(
        outcome.individual_results.len(),
        expected_dice as usize,
        "kept set size does not match the rolled groups"
    );
    let sum: i64 = outcome.individual_results.iter().map(|&f| i64::from(f)).sum();
    assert_eq!(outcome.dice_sum, sum, "dice_sum is not the sum of kept faces");
    assert_eq!(
        outcome.total,
        sum + i64::from(outcome.modifier),
        "total is not dice_sum + modifier"
    );
    if let Some((first, second)) = &outcome.alternate_results {
        assert!(
            outcome.individual_results == *first || outcome.individual_results == *second,
            "kept set is neither of the two draws"
        );
    }
}
