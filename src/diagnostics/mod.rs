//! Diagnostics and statistics
//!
//! This module provides the per-generation history of a run and the outcome
//! tally accumulated over many runs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::population::population::Population;
use crate::termination::RunOutcome;

/// Summary statistics of one generation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation number
    pub generation: usize,
    /// Mean fitness
    pub fitness_avg: f64,
    /// Best fitness
    pub fitness_max: f64,
    /// Mean objective value
    pub value_avg: f64,
    /// Lowest objective value
    pub value_min: f64,
}

impl GenerationRecord {
    /// Compute statistics from a population
    pub fn from_population(population: &Population) -> Self {
        let fitness = population.fitness_stats();
        let value = population.value_stats();
        Self {
            generation: population.generation(),
            fitness_avg: fitness.average,
            fitness_max: fitness.max,
            value_avg: value.average,
            value_min: value.min,
        }
    }
}

/// Fitness and value curves of a single run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct History {
    records: Vec<GenerationRecord>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the statistics of `population`
    pub fn record(&mut self, population: &Population) {
        self.records.push(GenerationRecord::from_population(population));
    }

    /// All recorded generations, oldest first
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Number of recorded generations
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record
    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    /// Best fitness per generation
    pub fn best_fitness_curve(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.fitness_max).collect()
    }

    /// Forget all records
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Number of runs that ended with each outcome
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    counts: [usize; 4],
}

impl OutcomeTally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one run
    pub fn record(&mut self, outcome: RunOutcome) {
        self.counts[outcome.index()] += 1;
    }

    /// Runs that ended with `outcome`
    pub fn count(&self, outcome: RunOutcome) -> usize {
        self.counts[outcome.index()]
    }

    /// Total runs counted
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Runs that reached the optimum by either convergence test
    pub fn successes(&self) -> usize {
        self.count(RunOutcome::ConvergedX) + self.count(RunOutcome::ConvergedY)
    }

    /// Add another tally into this one
    pub fn merge(&mut self, other: &OutcomeTally) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            *mine += theirs;
        }
    }

    /// Reset every count to zero
    pub fn clear(&mut self) {
        self.counts = [0; 4];
    }

    /// Iterate `(outcome, count)` in priority order
    pub fn iter(&self) -> impl Iterator<Item = (RunOutcome, usize)> + '_ {
        RunOutcome::ALL.iter().map(move |&o| (o, self.count(o)))
    }

    /// The tally as a map
    pub fn to_map(&self) -> BTreeMap<RunOutcome, usize> {
        self.iter().collect()
    }
}

impl fmt::Display for OutcomeTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (outcome, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", outcome, count)?;
        }
        Ok(())
    }
}

impl FromIterator<RunOutcome> for OutcomeTally {
    fn from_iter<I: IntoIterator<Item = RunOutcome>>(iter: I) -> Self {
        let mut tally = Self::new();
        for outcome in iter {
            tally.record(outcome);
        }
        tally
    }
}

pub mod prelude {
    pub use super::{GenerationRecord, History, OutcomeTally};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::individual::Individual;

    #[test]
    fn test_record_from_population() {
        let pop = Population::from_individuals(
            vec![
                Individual::from_value(vec![0.0], 0.0, 0.0),
                Individual::from_value(vec![1.0], 1.0, 0.0),
            ],
            2,
        )
        .unwrap();
        let record = GenerationRecord::from_population(&pop);
        assert_eq!(record.generation, 2);
        assert_eq!(record.fitness_max, 100.0);
        assert_eq!(record.fitness_avg, 75.0);
        assert_eq!(record.value_avg, 0.5);
        assert_eq!(record.value_min, 0.0);

        let mut history = History::new();
        history.record(&pop);
        history.record(&pop);
        assert_eq!(history.len(), 2);
        assert_eq!(history.best_fitness_curve(), vec![100.0, 100.0]);
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_tally() {
        let mut tally: OutcomeTally = [
            RunOutcome::ConvergedX,
            RunOutcome::ConvergedX,
            RunOutcome::ExceededGenerations,
        ]
        .into_iter()
        .collect();
        tally.record(RunOutcome::ConvergedY);

        assert_eq!(tally.count(RunOutcome::ConvergedX), 2);
        assert_eq!(tally.count(RunOutcome::PrematureConvergence), 0);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.successes(), 3);
        assert_eq!(
            tally.to_string(),
            "x convergence: 2, y convergence: 1, premature convergence: 0, exceeded # gens: 1"
        );

        tally.clear();
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_tally_merge_is_order_independent() {
        let a: OutcomeTally = [RunOutcome::ConvergedX, RunOutcome::PrematureConvergence]
            .into_iter()
            .collect();
        let b: OutcomeTally = [RunOutcome::PrematureConvergence].into_iter().collect();

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);
        assert_eq!(ab, ba);
        assert_eq!(ab.to_map()[&RunOutcome::PrematureConvergence], 2);
    }
}
