//! Roller - the high-level API for front ends.
//!
//! Wraps a random generator, a configuration and a roll sink so a caller
//! can roll notation, quick dice and attacks without threading those
//! through every call.

use crate::attack::{roll_spell_attack, roll_weapon_attack, AttackOptions, AttackOutcome};
use crate::character::{CharacterId, CharacterProfile};
use crate::dice::{DiceError, DiceExpression, DiceGroup, DieType, RollOutcome, RollPolicy};
use crate::history::{RollHistory, RollRecord, RollSink, RollType};
use crate::items::{SpellProfile, WeaponProfile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

/// Configuration for a [`Roller`].
#[derive(Debug, Clone, Default)]
pub struct RollerConfig {
    /// Seed for reproducible rolls. Entropy is used when unset.
    pub seed: Option<u64>,

    /// Maximum number of records kept by the default history.
    pub history_limit: Option<usize>,

    /// Character that quick and notation rolls are attributed to.
    pub character_id: Option<CharacterId>,
}

impl RollerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn with_character_id(mut self, id: CharacterId) -> Self {
        self.character_id = Some(id);
        self
    }
}

/// Rolls dice and records every result in its sink.
pub struct Roller<S: RollSink = RollHistory> {
    config: RollerConfig,
    rng: StdRng,
    sink: S,
}

impl Roller<RollHistory> {
    pub fn new(config: RollerConfig) -> Self {
        let history = match config.history_limit {
            Some(limit) => RollHistory::with_limit(limit),
            None => RollHistory::new(),
        };
        Self::with_sink(config, history)
    }

    pub fn history(&self) -> &RollHistory {
        &self.sink
    }
}

impl<S: RollSink> Roller<S> {
    pub fn with_sink(config: RollerConfig, sink: S) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(seed = ?config.seed, history_limit = ?config.history_limit, "roller created");
        Self { config, rng, sink }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Parse and roll a notation string.
    pub fn roll(&mut self, notation: &str, policy: RollPolicy) -> Result<RollOutcome, DiceError> {
        let expr = DiceExpression::parse(notation)?;
        let outcome = expr.execute_with(policy, &mut self.rng)?;
        self.record_quick(&outcome);
        Ok(outcome)
    }

    /// Roll a single die of a standard type.
    pub fn quick_roll(&mut self, die: DieType, policy: RollPolicy) -> Result<RollOutcome, DiceError> {
        let expr = DiceExpression::from_parts(vec![DiceGroup::new(1, die.sides())], 0);
        let outcome = expr.execute_with(policy, &mut self.rng)?;
        self.record_quick(&outcome);
        Ok(outcome)
    }

    pub fn weapon_attack(
        &mut self,
        character: &CharacterProfile,
        weapon: &WeaponProfile,
        options: AttackOptions,
    ) -> Result<AttackOutcome, DiceError> {
        let outcome = roll_weapon_attack(character, weapon, options, &mut self.rng)?;
        self.sink.record(outcome.to_record(character));
        Ok(outcome)
    }

    pub fn spell_attack(
        &mut self,
        character: &CharacterProfile,
        spell: &SpellProfile,
        options: AttackOptions,
    ) -> Result<AttackOutcome, DiceError> {
        let outcome = roll_spell_attack(character, spell, options, &mut self.rng)?;
        self.sink.record(outcome.to_record(character));
        Ok(outcome)
    }

    fn record_quick(&mut self, outcome: &RollOutcome) {
        let mut record = RollRecord::new(RollType::Quick, outcome.notation.clone(), outcome.total);
        record.character_id = self.config.character_id;
        record.natural_roll = outcome.individual_results.first().copied();
        record.modifiers = outcome.modifier;
        record.is_critical = outcome.is_critical_die;
        debug!(notation = %record.notation, total = record.final_result, "recorded quick roll");
        self.sink.record(record);
    }
}
