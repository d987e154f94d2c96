//! Roll history.
//!
//! The core never persists anything itself; it hands finished
//! [`RollRecord`]s to a [`RollSink`]. `RollHistory` is the in-memory sink
//! used by the terminal front end and by tests.

use crate::character::CharacterId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// What kind of roll a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollType {
    Attack,
    SpellAttack,
    Quick,
}

impl fmt::Display for RollType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RollType::Attack => "Attack",
            RollType::SpellAttack => "Spell Attack",
            RollType::Quick => "Quick Roll",
        };
        write!(f, "{label}")
    }
}

/// A finished roll, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollRecord {
    pub id: Uuid,
    pub character_id: Option<CharacterId>,
    pub roll_type: RollType,
    /// Weapon or spell name, when the roll came from one.
    pub source: Option<String>,
    pub notation: String,
    /// Face of the headline die (the d20 for attacks).
    pub natural_roll: Option<u32>,
    pub modifiers: i32,
    pub final_result: i64,
    /// A kept d20 showed a natural 20.
    pub is_critical: bool,
    pub damage: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

impl RollRecord {
    pub fn new(roll_type: RollType, notation: impl Into<String>, final_result: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            character_id: None,
            roll_type,
            source: None,
            notation: notation.into(),
            natural_roll: None,
            modifiers: 0,
            final_result,
            is_critical: false,
            damage: None,
            timestamp: Utc::now(),
        }
    }

    pub fn for_character(mut self, id: CharacterId) -> Self {
        self.character_id = Some(id);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Destination for finished rolls.
pub trait RollSink {
    fn record(&mut self, record: RollRecord);
}

impl RollSink for Vec<RollRecord> {
    fn record(&mut self, record: RollRecord) {
        self.push(record);
    }
}

/// In-memory roll log, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollHistory {
    records: VecDeque<RollRecord>,
    limit: Option<usize>,
}

impl RollHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` records, dropping the oldest.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit: Some(limit),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&RollRecord> {
        self.records.front()
    }

    /// Newest `limit` records.
    pub fn recent(&self, limit: usize) -> Vec<&RollRecord> {
        self.records.iter().take(limit).collect()
    }

    /// Newest `limit` records for one character.
    pub fn for_character(&self, id: CharacterId, limit: usize) -> Vec<&RollRecord> {
        self.records
            .iter()
            .filter(|r| r.character_id == Some(id))
            .take(limit)
            .collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &RollRecord> {
        self.records.iter()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records)
    }
}

impl RollSink for RollHistory {
    fn record(&mut self, record: RollRecord) {
        self.records.push_front(record);
        if let Some(limit) = self.limit {
            self.records.truncate(limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(total: i64) -> RollRecord {
        RollRecord::new(RollType::Quick, "1d20", total)
    }

    #[test]
    fn test_newest_first() {
        let mut history = RollHistory::new();
        history.record(quick(1));
        history.record(quick(2));
        history.record(quick(3));
        let totals: Vec<i64> = history.recent(2).iter().map(|r| r.final_result).collect();
        assert_eq!(totals, vec![3, 2]);
        assert_eq!(history.latest().map(|r| r.final_result), Some(3));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = RollHistory::with_limit(2);
        for total in 1..=5 {
            history.record(quick(total));
        }
        assert_eq!(history.len(), 2);
        let totals: Vec<i64> = history.iter().map(|r| r.final_result).collect();
        assert_eq!(totals, vec![5, 4]);
    }

    #[test]
    fn test_for_character() {
        let thorvik = CharacterId::new();
        let other = CharacterId::new();
        let mut history = RollHistory::new();
        history.record(quick(1).for_character(thorvik));
        history.record(quick(2).for_character(other));
        history.record(quick(3).for_character(thorvik));
        history.record(quick(4));

        let totals: Vec<i64> = history
            .for_character(thorvik, 10)
            .iter()
            .map(|r| r.final_result)
            .collect();
        assert_eq!(totals, vec![3, 1]);
        assert_eq!(history.for_character(thorvik, 1).len(), 1);
    }

    #[test]
    fn test_json_export() {
        let mut history = RollHistory::new();
        history.record(quick(12).with_source("Dagger"));
        let json = history.to_json().unwrap();
        let parsed: Vec<RollRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].source.as_deref(), Some("Dagger"));
        assert_eq!(parsed[0].roll_type, RollType::Quick);
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<RollRecord> = Vec::new();
        sink.record(quick(7));
        assert_eq!(sink.len(), 1);
    }
}
