//! Generational genetic algorithm
//!
//! This module implements the evolution loop: binary tournament selection,
//! SBX crossover of consecutive parent pairs and wholesale generational
//! replacement, repeated until one of the stopping criteria fires.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rand::{rngs::StdRng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::RunConfig;
use crate::diagnostics::{History, OutcomeTally};
use crate::error::{ConfigError, EvoResult};
use crate::fitness::traits::Objective;
use crate::operators::crossover::SbxCrossover;
use crate::operators::selection::PairwiseTournament;
use crate::operators::traits::{CrossoverOperator, SelectionOperator};
use crate::population::individual::Individual;
use crate::population::population::{init_population, Population};
use crate::termination::{EvolutionState, RunOutcome, StoppingRules};

/// Hook invoked by the run loop
///
/// Returning [`ControlFlow::Break`] cancels the run (or batch) at the next
/// generation boundary. A population that already satisfies a stopping
/// criterion still finishes its run.
pub trait GenerationObserver {
    /// Called for the initial population and after every generation advance
    fn on_generation(&mut self, _population: &Population) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Called after every completed run of a batch with the updated tally
    fn on_run_complete(&mut self, _outcome: RunOutcome, _tally: &OutcomeTally) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<F> GenerationObserver for F
where
    F: FnMut(&Population) -> ControlFlow<()>,
{
    fn on_generation(&mut self, population: &Population) -> ControlFlow<()> {
        self(population)
    }
}

/// Observer that never interrupts
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObserver;

impl GenerationObserver for NoObserver {}

/// Shared cancellation flag
///
/// Clones share the same flag, so one handle can be given to another thread
/// while the run loop observes the other.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// Create a flag in the running state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn flow(&self) -> ControlFlow<()> {
        if self.is_stopped() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

impl GenerationObserver for StopFlag {
    fn on_generation(&mut self, _population: &Population) -> ControlFlow<()> {
        self.flow()
    }

    fn on_run_complete(&mut self, _outcome: RunOutcome, _tally: &OutcomeTally) -> ControlFlow<()> {
        self.flow()
    }
}

/// How an observed run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// A stopping criterion fired
    Finished(RunOutcome),
    /// The observer interrupted the run first
    Cancelled,
}

/// Result of a single observed run
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    /// How the run ended
    pub status: RunStatus,
    /// Generations completed
    pub generations: usize,
    /// Best individual of the final population
    pub best: Individual,
    /// Statistics of every population the run produced
    pub history: History,
    /// The final population
    pub population: Population,
}

impl RunReport {
    /// The outcome, unless the run was cancelled
    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.status {
            RunStatus::Finished(outcome) => Some(outcome),
            RunStatus::Cancelled => None,
        }
    }
}

/// Result of a batch of runs
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchReport {
    /// Outcomes of the completed runs
    pub tally: OutcomeTally,
    /// Number of runs asked for
    pub requested: usize,
    /// Whether the batch stopped before completing every run
    pub cancelled: bool,
}

impl BatchReport {
    /// Number of completed runs
    pub fn completed(&self) -> usize {
        self.tally.total()
    }
}

/// Generational GA bound to one objective and one configuration
///
/// The configuration is validated when the engine is built, so every later
/// operation can assume consistent dimensions and parameter ranges.
pub struct Evolution<'o, S = PairwiseTournament, C = SbxCrossover> {
    config: RunConfig,
    objective: &'o dyn Objective,
    selection: S,
    crossover: C,
    rules: StoppingRules,
}

impl<'o> Evolution<'o> {
    /// Build the engine with tournament selection and SBX from `config`
    pub fn new(config: RunConfig, objective: &'o dyn Objective) -> EvoResult<Self> {
        let crossover = SbxCrossover::from_config(&config)?;
        Self::with_operators(config, objective, PairwiseTournament, crossover)
    }
}

impl<'o, S, C> Evolution<'o, S, C>
where
    S: SelectionOperator,
    C: CrossoverOperator,
{
    /// Build the engine with custom operators
    pub fn with_operators(
        config: RunConfig,
        objective: &'o dyn Objective,
        selection: S,
        crossover: C,
    ) -> EvoResult<Self> {
        config.validate_for(objective)?;
        let rules = StoppingRules::from_config(&config);
        Ok(Self {
            config,
            objective,
            selection,
            crossover,
            rules,
        })
    }

    /// The validated configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The objective being minimized
    pub fn objective(&self) -> &'o dyn Objective {
        self.objective
    }

    /// Sample a fresh generation-zero population
    pub fn init_population<R: Rng + ?Sized>(&self, rng: &mut R) -> EvoResult<Population> {
        init_population(&self.config, self.objective, rng)
    }

    /// Classify `population`, or `None` if the run should continue
    pub fn check(&self, population: &Population) -> Option<RunOutcome> {
        self.rules
            .evaluate(&EvolutionState::new(population, self.objective))
    }

    /// Produce the next generation
    ///
    /// Parents are paired as `(2k, 2k + 1)` and each pair yields two children
    /// in order, so the size is unchanged. An odd-sized population is a
    /// configuration error.
    pub fn advance<R: Rng + ?Sized>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> EvoResult<Population> {
        if population.len() % 2 != 0 {
            return Err(ConfigError::OddPopulation(population.len()).into());
        }
        let parents = self.selection.select_parents(population.individuals(), rng);

        let mut children = Vec::with_capacity(parents.len());
        for pair in parents.chunks_exact(2) {
            let (child1, child2) =
                self.crossover
                    .crossover(&pair[0], &pair[1], self.objective, rng)?;
            children.push(child1);
            children.push(child2);
        }

        let next = Population::from_individuals(children, population.generation() + 1)?;
        debug!(
            generation = next.generation(),
            fitness_avg = next.fitness_stats().average,
            fitness_max = next.fitness_stats().max,
            value_min = next.value_stats().min,
            "generation advanced"
        );
        Ok(next)
    }

    /// Run from a fresh population until a stopping criterion fires
    pub fn run_once<R: Rng + ?Sized>(&self, rng: &mut R) -> EvoResult<RunOutcome> {
        let mut population = self.init_population(rng)?;
        loop {
            if let Some(outcome) = self.check(&population) {
                info!(
                    objective = self.objective.name(),
                    %outcome,
                    generations = population.generation(),
                    "run finished"
                );
                return Ok(outcome);
            }
            population = self.advance(&population, rng)?;
        }
    }

    /// Run from a fresh population, reporting every generation to `observer`
    pub fn run_observed<R, O>(&self, rng: &mut R, observer: &mut O) -> EvoResult<RunReport>
    where
        R: Rng + ?Sized,
        O: GenerationObserver + ?Sized,
    {
        let population = self.init_population(rng)?;
        let mut history = History::new();
        history.record(&population);
        self.continue_observed(population, history, rng, observer)
    }

    /// Resume a run from `population`
    ///
    /// `history` must already hold the record of `population`; every later
    /// generation is appended to it.
    pub fn continue_observed<R, O>(
        &self,
        mut population: Population,
        mut history: History,
        rng: &mut R,
        observer: &mut O,
    ) -> EvoResult<RunReport>
    where
        R: Rng + ?Sized,
        O: GenerationObserver + ?Sized,
    {
        loop {
            let flow = observer.on_generation(&population);

            let status = match (self.check(&population), flow) {
                (Some(outcome), _) => RunStatus::Finished(outcome),
                (None, ControlFlow::Break(())) => RunStatus::Cancelled,
                (None, ControlFlow::Continue(())) => {
                    population = self.advance(&population, rng)?;
                    history.record(&population);
                    continue;
                }
            };

            match status {
                RunStatus::Finished(outcome) => info!(
                    objective = self.objective.name(),
                    %outcome,
                    generations = population.generation(),
                    "run finished"
                ),
                RunStatus::Cancelled => info!(
                    objective = self.objective.name(),
                    generations = population.generation(),
                    "run cancelled"
                ),
            }

            return Ok(RunReport {
                status,
                generations: population.generation(),
                best: population.best().clone(),
                history,
                population,
            });
        }
    }

    /// Run `run_count` independent attempts and tally their outcomes
    pub fn run_batch<R: Rng + ?Sized>(
        &self,
        run_count: usize,
        rng: &mut R,
    ) -> EvoResult<OutcomeTally> {
        let mut tally = OutcomeTally::new();
        for _ in 0..run_count {
            tally.record(self.run_once(rng)?);
        }
        info!(objective = self.objective.name(), %tally, "batch finished");
        Ok(tally)
    }

    /// Run a batch that `observer` may cancel between generations or runs
    ///
    /// A cancelled run is not counted; the tally holds every run that
    /// completed before the cancellation.
    pub fn run_batch_observed<R, O>(
        &self,
        run_count: usize,
        rng: &mut R,
        observer: &mut O,
    ) -> EvoResult<BatchReport>
    where
        R: Rng + ?Sized,
        O: GenerationObserver + ?Sized,
    {
        let mut tally = OutcomeTally::new();
        let mut cancelled = false;

        for _ in 0..run_count {
            let report = self.run_observed(rng, observer)?;
            match report.status {
                RunStatus::Finished(outcome) => {
                    tally.record(outcome);
                    if observer.on_run_complete(outcome, &tally).is_break() {
                        cancelled = tally.total() < run_count;
                        break;
                    }
                }
                RunStatus::Cancelled => {
                    cancelled = true;
                    break;
                }
            }
        }

        info!(
            objective = self.objective.name(),
            %tally,
            cancelled,
            "batch finished"
        );
        Ok(BatchReport {
            tally,
            requested: run_count,
            cancelled,
        })
    }
}

#[cfg(feature = "parallel")]
impl<'o, S, C> Evolution<'o, S, C>
where
    S: SelectionOperator,
    C: CrossoverOperator,
{
    /// Run a batch across the rayon thread pool
    ///
    /// Run `i` owns `StdRng::seed_from_u64(seed + i)`, so the tally for a given
    /// seed does not depend on scheduling. Raising `stop` cancels runs that
    /// have not finished yet.
    pub fn run_batch_parallel(
        &self,
        run_count: usize,
        seed: u64,
        stop: &StopFlag,
    ) -> EvoResult<BatchReport> {
        let outcomes = (0..run_count)
            .into_par_iter()
            .map(|i| {
                if stop.is_stopped() {
                    return Ok(None);
                }
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                let mut observer = stop.clone();
                let report = self.run_observed(&mut rng, &mut observer)?;
                Ok(report.outcome())
            })
            .collect::<EvoResult<Vec<Option<RunOutcome>>>>()?;

        let tally: OutcomeTally = outcomes.into_iter().flatten().collect();
        let cancelled = tally.total() < run_count;
        info!(
            objective = self.objective.name(),
            %tally,
            cancelled,
            "parallel batch finished"
        );
        Ok(BatchReport {
            tally,
            requested: run_count,
            cancelled,
        })
    }
}

/// Advance `population` by one generation with the operators of `config`
pub fn advance_generation<R: Rng + ?Sized>(
    population: &Population,
    config: &RunConfig,
    objective: &dyn Objective,
    rng: &mut R,
) -> EvoResult<Population> {
    Evolution::new(config.clone(), objective)?.advance(population, rng)
}

/// Run one optimization attempt to its outcome
pub fn run_once<R: Rng + ?Sized>(
    config: &RunConfig,
    objective: &dyn Objective,
    rng: &mut R,
) -> EvoResult<RunOutcome> {
    Evolution::new(config.clone(), objective)?.run_once(rng)
}

/// Run `run_count` independent attempts and tally the outcomes
pub fn run_batch<R: Rng + ?Sized>(
    config: &RunConfig,
    objective: &dyn Objective,
    run_count: usize,
    rng: &mut R,
) -> EvoResult<OutcomeTally> {
    Evolution::new(config.clone(), objective)?.run_batch(run_count, rng)
}
