//! Dice notation parsing and roll execution.
//!
//! Supports compound notation such as `2d6+1d4+5`, advantage/disadvantage
//! (roll the whole expression twice) and critical hits (double every dice
//! group before rolling).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Largest dice count accepted in a single group.
pub const MAX_DICE_PER_GROUP: u32 = 1000;

/// Largest die accepted by the parser.
pub const MAX_SIDES: u32 = 1000;

/// Why a notation string was rejected by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ParseFailure {
    #[error("notation is empty")]
    Empty,
    #[error("no dice term in `{0}`")]
    NoDice(String),
    #[error("malformed term `{0}`")]
    MalformedTerm(String),
    #[error("dice count must be positive in `{0}`")]
    NonPositiveCount(String),
    #[error("die sides must be positive in `{0}`")]
    NonPositiveSides(String),
    #[error("`{0}` is outside the supported range")]
    OutOfRange(String),
}

/// Error type for dice parsing and rolling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    Parse(#[from] ParseFailure),
    #[error("Invalid dice expression: {0}")]
    InvalidExpression(String),
}

/// Advantage state for a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Advantage {
    pub fn label(&self) -> &'static str {
        match self {
            Advantage::Normal => "Normal",
            Advantage::Advantage => "Advantage",
            Advantage::Disadvantage => "Disadvantage",
        }
    }
}

/// Standard D&D die types, used for quick rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            100 => Some(DieType::D100),
            _ => None,
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl FromStr for DieType {
    type Err = ParseFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        lower
            .strip_prefix('d')
            .and_then(|sides| sides.parse().ok())
            .and_then(DieType::from_sides)
            .ok_or_else(|| ParseFailure::MalformedTerm(s.trim().to_string()))
    }
}

/// How a roll is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RollPolicy {
    pub advantage: bool,
    pub disadvantage: bool,
    pub critical: bool,
}

impl RollPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_advantage(mut self) -> Self {
        self.advantage = true;
        self
    }

    pub fn with_disadvantage(mut self) -> Self {
        self.disadvantage = true;
        self
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Effective advantage state. Both flags cancel out.
    pub fn advantage_state(&self) -> Advantage {
        match (self.advantage, self.disadvantage) {
            (true, false) => Advantage::Advantage,
            (false, true) => Advantage::Disadvantage,
            _ => Advantage::Normal,
        }
    }
}

/// One `<count>d<sides>` term of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceGroup {
    pub count: u32,
    pub sides: u32,
}

impl DiceGroup {
    pub fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }
}

impl fmt::Display for DiceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Anything that can produce a uniformly distributed die face.
pub trait DiceSource {
    /// Roll one die, returning a face in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: Rng + ?Sized> DiceSource for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides)
    }
}

/// A complete dice expression (e.g., 2d6+1d4+3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub groups: Vec<DiceGroup>,
    pub modifier: i32,
    pub notation: String,
}

impl DiceExpression {
    /// Parse a dice notation string.
    pub fn parse(notation: &str) -> Result<Self, ParseFailure> {
        let notation: String = notation
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        if notation.is_empty() {
            return Err(ParseFailure::Empty);
        }

        let mut groups = Vec::new();
        let mut modifier: i32 = 0;
        let mut current = String::new();
        let mut sign: i32 = 1;

        for (i, ch) in notation.chars().enumerate() {
            match ch {
                '+' | '-' => {
                    if current.is_empty() {
                        // Only the very first term may carry its own sign.
                        if i != 0 {
                            return Err(ParseFailure::MalformedTerm(notation.clone()));
                        }
                    } else {
                        Self::parse_term(&current, sign, &mut groups, &mut modifier)?;
                        current.clear();
                    }
                    sign = if ch == '+' { 1 } else { -1 };
                }
                _ => current.push(ch),
            }
        }

        if current.is_empty() {
            return Err(ParseFailure::MalformedTerm(notation));
        }
        Self::parse_term(&current, sign, &mut groups, &mut modifier)?;

        if groups.is_empty() {
            return Err(ParseFailure::NoDice(notation));
        }

        Ok(DiceExpression {
            groups,
            modifier,
            notation,
        })
    }

    fn parse_term(
        term: &str,
        sign: i32,
        groups: &mut Vec<DiceGroup>,
        modifier: &mut i32,
    ) -> Result<(), ParseFailure> {
        if let Some((count_str, sides_str)) = term.split_once('d') {
            if sign < 0 {
                return Err(ParseFailure::MalformedTerm(format!("-{term}")));
            }
            let count = parse_unsigned(count_str, term)?;
            let sides = parse_unsigned(sides_str, term)?;
            if count == 0 {
                return Err(ParseFailure::NonPositiveCount(term.to_string()));
            }
            if sides == 0 {
                return Err(ParseFailure::NonPositiveSides(term.to_string()));
            }
            if count > MAX_DICE_PER_GROUP || sides > MAX_SIDES {
                return Err(ParseFailure::OutOfRange(term.to_string()));
            }
            groups.push(DiceGroup::new(count, sides));
        } else {
            let value = parse_unsigned(term, term)?;
            let value =
                i32::try_from(value).map_err(|_| ParseFailure::OutOfRange(term.to_string()))?;
            *modifier = modifier
                .checked_add(sign * value)
                .ok_or_else(|| ParseFailure::OutOfRange(term.to_string()))?;
        }
        Ok(())
    }

    /// Build an expression from already validated parts.
    pub fn from_parts(groups: Vec<DiceGroup>, modifier: i32) -> Self {
        let mut notation = groups
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join("+");
        if modifier != 0 {
            notation.push_str(&format!("{modifier:+}"));
        }
        Self {
            groups,
            modifier,
            notation,
        }
    }

    /// A single d20 plus a flat bonus, as used for attack rolls.
    pub fn d20_check(bonus: i32) -> Self {
        Self::from_parts(vec![DiceGroup::new(1, 20)], bonus)
    }

    /// Total number of dice rolled by one draw of this expression.
    pub fn dice_count(&self) -> u32 {
        self.groups.iter().map(|g| g.count).sum()
    }

    fn validate(&self) -> Result<(), DiceError> {
        if self.groups.is_empty() {
            return Err(DiceError::InvalidExpression(format!(
                "`{}` has no dice groups",
                self.notation
            )));
        }
        if let Some(bad) = self.groups.iter().find(|g| {
            g.count == 0 || g.sides == 0 || g.count > MAX_DICE_PER_GROUP || g.sides > MAX_SIDES
        }) {
            return Err(DiceError::InvalidExpression(format!(
                "`{}` contains unusable group {bad}",
                self.notation
            )));
        }
        Ok(())
    }

    /// Execute with the thread-local generator.
    pub fn execute(&self, policy: RollPolicy) -> Result<RollOutcome, DiceError> {
        self.execute_with(policy, &mut rand::thread_rng())
    }

    /// Execute with a specific dice source (useful for testing).
    pub fn execute_with<D: DiceSource + ?Sized>(
        &self,
        policy: RollPolicy,
        dice: &mut D,
    ) -> Result<RollOutcome, DiceError> {
        if let Err(e) = self.validate() {
            warn!(notation = %self.notation, "refusing to roll: {e}");
            return Err(e);
        }

        let groups: Vec<DiceGroup> = if policy.critical {
            self.groups
                .iter()
                .map(|g| DiceGroup::new(g.count * 2, g.sides))
                .collect()
        } else {
            self.groups.clone()
        };

        let first = draw(&groups, dice);
        let advantage = policy.advantage_state();
        let (kept, alternate_results) = match advantage {
            Advantage::Normal => (first, None),
            Advantage::Advantage | Advantage::Disadvantage => {
                let second = draw(&groups, dice);
                let (sum1, sum2) = (face_sum(&first), face_sum(&second));
                let take_second = match advantage {
                    Advantage::Advantage => sum2 > sum1,
                    Advantage::Disadvantage => sum2 < sum1,
                    Advantage::Normal => false,
                };
                let kept = if take_second {
                    second.clone()
                } else {
                    first.clone()
                };
                (kept, Some((first, second)))
            }
        };

        let is_critical_die = kept
            .iter()
            .zip(sides_per_die(&groups))
            .any(|(&face, sides)| sides == 20 && face == 20);
        let dice_sum = face_sum(&kept);
        let total = dice_sum + i64::from(self.modifier);

        debug!(
            notation = %self.notation,
            ?advantage,
            critical = policy.critical,
            total,
            "rolled dice"
        );

        Ok(RollOutcome {
            notation: self.notation.clone(),
            policy,
            groups,
            individual_results: kept,
            dice_sum,
            modifier: self.modifier,
            total,
            alternate_results,
            is_critical_die,
        })
    }
}

impl FromStr for DiceExpression {
    type Err = ParseFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceExpression::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation)
    }
}

fn parse_unsigned(digits: &str, term: &str) -> Result<u32, ParseFailure> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseFailure::MalformedTerm(term.to_string()));
    }
    digits
        .parse()
        .map_err(|_| ParseFailure::OutOfRange(term.to_string()))
}

fn draw<D: DiceSource + ?Sized>(groups: &[DiceGroup], dice: &mut D) -> Vec<u32> {
    groups
        .iter()
        .flat_map(|g| std::iter::repeat(g.sides).take(g.count as usize))
        .map(|sides| dice.roll_die(sides))
        .collect()
}

fn sides_per_die(groups: &[DiceGroup]) -> impl Iterator<Item = u32> + '_ {
    groups
        .iter()
        .flat_map(|g| std::iter::repeat(g.sides).take(g.count as usize))
}

fn face_sum(faces: &[u32]) -> i64 {
    faces.iter().map(|&f| i64::from(f)).sum()
}

/// Complete result of a dice roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub notation: String,
    pub policy: RollPolicy,
    /// Groups actually rolled (counts already doubled on a critical).
    pub groups: Vec<DiceGroup>,
    /// Faces of the kept set, in roll order.
    pub individual_results: Vec<u32>,
    pub dice_sum: i64,
    pub modifier: i32,
    pub total: i64,
    /// Both draws when advantage or disadvantage caused a re-roll.
    pub alternate_results: Option<(Vec<u32>, Vec<u32>)>,
    /// A d20 in the kept set shows a natural 20.
    pub is_critical_die: bool,
}

impl RollOutcome {
    /// Advantage state that actually shaped this outcome.
    pub fn advantage_applied(&self) -> Advantage {
        if self.alternate_results.is_some() {
            self.policy.advantage_state()
        } else {
            Advantage::Normal
        }
    }

    /// Face of the first d20 in the kept set, if any.
    pub fn d20_face(&self) -> Option<u32> {
        self.individual_results
            .iter()
            .zip(sides_per_die(&self.groups))
            .find(|(_, sides)| *sides == 20)
            .map(|(&face, _)| face)
    }
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::format_outcome(self))
    }
}

/// Parse a notation string.
pub fn parse(notation: &str) -> Result<DiceExpression, ParseFailure> {
    DiceExpression::parse(notation)
}

/// Execute an already parsed expression with the thread-local generator.
pub fn execute(expr: &DiceExpression, policy: RollPolicy) -> Result<RollOutcome, DiceError> {
    expr.execute(policy)
}

/// Convenience function to parse and roll in one step.
pub fn roll(notation: &str, policy: RollPolicy) -> Result<RollOutcome, DiceError> {
    let expr = DiceExpression::parse(notation)?;
    expr.execute(policy)
}
