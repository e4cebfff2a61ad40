use std::collections::BTreeMap;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use tracing::info;

use crate::{
    simulation::{RoundEngine, RoundEventHandler, RoundResult, SilentHandler},
    strategy::Strategy,
    Decision, GameError, Outcome,
};

pub const DEFAULT_NUMBER_OF_ROUNDS: u64 = 100_000;
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Rounds are grouped by what the player saw and what they did first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SituationKey {
    pub player_total: u16,
    pub dealer_up_card: u8,
    pub decision: Decision,
}

impl SituationKey {
    pub fn of(result: &RoundResult) -> Self {
        SituationKey {
            player_total: result.initial_situation.player_total,
            dealer_up_card: result.initial_situation.dealer_up_card,
            decision: result.initial_decision,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.wins + self.losses + self.draws
    }

    /// Net units won, one unit staked per round.
    pub fn wallet(&self) -> i64 {
        self.wins as i64 - self.losses as i64
    }

    pub fn expected_value(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.wallet() as f64 / self.total() as f64
        }
    }
}

impl std::ops::AddAssign<&OutcomeCounts> for OutcomeCounts {
    fn add_assign(&mut self, rhs: &OutcomeCounts) {
        self.wins += rhs.wins;
        self.losses += rhs.losses;
        self.draws += rhs.draws;
    }
}

/// One line of the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultRow {
    pub player_total: u16,
    pub dealer_up_card: u8,
    pub decision: Decision,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub expected_value: f64,
}

/// Outcome counts per `SituationKey`, ordered by player total, up-card, then decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsTable {
    entries: BTreeMap<SituationKey, OutcomeCounts>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &RoundResult) {
        self.entries
            .entry(SituationKey::of(result))
            .or_default()
            .record(result.outcome);
    }

    pub fn get(&self, key: &SituationKey) -> Option<&OutcomeCounts> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SituationKey, &OutcomeCounts)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts over every key.
    pub fn totals(&self) -> OutcomeCounts {
        let mut totals = OutcomeCounts::default();
        for counts in self.entries.values() {
            totals += counts;
        }
        totals
    }

    pub fn rows(&self) -> impl Iterator<Item = ResultRow> + '_ {
        self.entries.iter().map(|(key, counts)| ResultRow {
            player_total: key.player_total,
            dealer_up_card: key.dealer_up_card,
            decision: key.decision,
            wins: counts.wins,
            losses: counts.losses,
            draws: counts.draws,
            expected_value: counts.expected_value(),
        })
    }
}

/// Serialized as a list of `ResultRow`s, since the keys are not strings.
impl Serialize for ResultsTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for row in self.rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

/// Plays many rounds in a row on one engine and tabulates the outcomes.
///
/// The engine's shoe is not reset between rounds, so a run models one
/// continuously dealt shoe.
#[derive(Debug, Clone, Copy)]
pub struct SimulationAggregator {
    number_of_rounds: u64,
    progress_interval: u64,
}

impl SimulationAggregator {
    pub fn new(number_of_rounds: u64) -> Self {
        SimulationAggregator {
            number_of_rounds,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Log progress every `progress_interval` rounds. Zero turns progress logging off.
    pub fn with_progress_interval(mut self, progress_interval: u64) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    pub fn number_of_rounds(&self) -> u64 {
        self.number_of_rounds
    }

    pub fn run<S>(
        &self,
        engine: &mut RoundEngine,
        strategy: &mut S,
    ) -> Result<ResultsTable, GameError>
    where
        S: Strategy + ?Sized,
    {
        self.run_with_handler(engine, strategy, &mut SilentHandler)
    }

    pub fn run_with_handler<S, H>(
        &self,
        engine: &mut RoundEngine,
        strategy: &mut S,
        handler: &mut H,
    ) -> Result<ResultsTable, GameError>
    where
        S: Strategy + ?Sized,
        H: RoundEventHandler + ?Sized,
    {
        info!(
            number_of_rounds = self.number_of_rounds,
            number_of_decks = engine.shoe().number_of_decks(),
            "starting simulation"
        );
        let mut table = ResultsTable::new();
        for round in 1..=self.number_of_rounds {
            let result = engine.play_round(strategy, handler)?;
            table.record(&result);
            if self.progress_interval > 0 && round % self.progress_interval == 0 {
                info!(round, total = self.number_of_rounds, "simulation progress");
            }
        }

        let totals = table.totals();
        info!(
            wins = totals.wins,
            losses = totals.losses,
            draws = totals.draws,
            wallet = totals.wallet(),
            reshuffles = engine.shoe().reshuffle_count(),
            "simulation finished"
        );
        Ok(table)
    }
}

impl Default for SimulationAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_NUMBER_OF_ROUNDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        simulation::{Rank, Shoe},
        strategy::{RandomStrategy, ScriptedStrategy, ThresholdStrategy},
        InitialSituation, Rule,
    };

    fn engine(seed: u64) -> RoundEngine {
        RoundEngine::new(Shoe::with_seed(&Rule::default(), seed).unwrap())
    }

    fn result(
        player_total: u16,
        dealer_up_card: u8,
        decision: Decision,
        outcome: Outcome,
    ) -> RoundResult {
        RoundResult {
            outcome,
            initial_situation: InitialSituation {
                player_total,
                dealer_up_card,
            },
            initial_decision: decision,
            player_total,
            dealer_total: 18,
            dealer_played: true,
        }
    }

    #[test]
    fn record_groups_by_key() {
        let mut table = ResultsTable::new();
        table.record(&result(12, 10, Decision::Hit, Outcome::Win));
        table.record(&result(12, 10, Decision::Hit, Outcome::Loss));
        table.record(&result(12, 10, Decision::Stand, Outcome::Loss));
        table.record(&result(20, 6, Decision::Stand, Outcome::Draw));

        assert_eq!(table.len(), 3);
        let key = SituationKey {
            player_total: 12,
            dealer_up_card: 10,
            decision: Decision::Hit,
        };
        assert_eq!(
            table.get(&key),
            Some(&OutcomeCounts {
                wins: 1,
                losses: 1,
                draws: 0
            })
        );
        let totals = table.totals();
        assert_eq!(totals.total(), 4);
        assert_eq!(totals.wallet(), -1);

        let rows: Vec<ResultRow> = table.rows().collect();
        assert_eq!(rows[0].decision, Decision::Hit);
        assert_eq!(rows[1].decision, Decision::Stand);
        assert_eq!(rows[2].player_total, 20);
        assert_eq!(rows[2].draws, 1);
    }

    #[test]
    fn expected_value_of_empty_counts_is_zero() {
        assert_eq!(OutcomeCounts::default().expected_value(), 0.0);
        let counts = OutcomeCounts {
            wins: 3,
            losses: 1,
            draws: 0,
        };
        assert_eq!(counts.expected_value(), 0.5);
    }

    #[test]
    fn every_round_is_recorded_once() {
        let mut engine = engine(21);
        let mut strategy = RandomStrategy::with_seed(22);
        let table = SimulationAggregator::new(5_000)
            .run(&mut engine, &mut strategy)
            .unwrap();
        assert_eq!(table.totals().total(), 5_000);
        for (key, counts) in table.iter() {
            assert!(counts.total() > 0);
            assert!(key.player_total >= 4 && key.player_total <= 21);
            assert!(key.dealer_up_card >= 2 && key.dealer_up_card <= 11);
        }
        // 5000 rounds of at least four cards each go through a 312-card shoe many times.
        assert!(engine.shoe().reshuffle_count() > 0);
    }

    #[test]
    fn key_counts_match_the_rounds_played() {
        let mut engine = engine(31);
        let mut strategy = RandomStrategy::with_seed(32);
        let mut expected: BTreeMap<SituationKey, u64> = BTreeMap::new();
        let mut table = ResultsTable::new();
        for _ in 0..2_000 {
            let result = engine
                .play_round(&mut strategy, &mut SilentHandler)
                .unwrap();
            *expected.entry(SituationKey::of(&result)).or_default() += 1;
            table.record(&result);
        }
        assert_eq!(table.len(), expected.len());
        for (key, rounds) in expected {
            assert_eq!(table.get(&key).map(OutcomeCounts::total), Some(rounds));
        }
    }

    #[test]
    fn stand_only_runs_never_record_hits() {
        let mut engine = engine(41);
        let mut strategy = ScriptedStrategy::new(vec![], Decision::Stand);
        let table = SimulationAggregator::new(500)
            .with_progress_interval(0)
            .run(&mut engine, &mut strategy)
            .unwrap();
        assert!(table.iter().all(|(key, _)| key.decision == Decision::Stand));
    }

    #[test]
    fn threshold_player_decides_by_initial_total() {
        let mut engine = engine(51);
        let mut strategy = ThresholdStrategy::new(12);
        let table = SimulationAggregator::new(1_000)
            .run(&mut engine, &mut strategy)
            .unwrap();
        for (key, _) in table.iter() {
            if key.player_total >= 12 {
                assert_eq!(key.decision, Decision::Stand);
            } else {
                assert_eq!(key.decision, Decision::Hit);
            }
        }
    }

    #[test]
    fn scripted_round_lands_in_its_key() {
        let mut engine = engine(61);
        engine
            .shoe_mut()
            .stack_with_firsts(&[Rank::Ten, Rank::Ten, Rank::Nine, Rank::Eight])
            .unwrap();
        let mut strategy = ScriptedStrategy::new(vec![], Decision::Stand);
        let table = SimulationAggregator::new(1)
            .run(&mut engine, &mut strategy)
            .unwrap();
        let key = SituationKey {
            player_total: 19,
            dealer_up_card: 10,
            decision: Decision::Stand,
        };
        assert_eq!(
            table.get(&key),
            Some(&OutcomeCounts {
                wins: 1,
                losses: 0,
                draws: 0
            })
        );
    }
}
