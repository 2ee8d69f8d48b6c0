//! Interactive stepping controller
//!
//! A [`Session`] keeps one objective, the settings for the next run, the run
//! in progress (if any) and the outcome tally across runs. Hosts drive it one
//! step at a time: generate an initial population, advance it, finish it, or
//! run whole batches.

use std::ops::ControlFlow;

use rand::Rng;
use tracing::{debug, info};

use crate::algorithms::generational::{
    advance_generation, BatchReport, Evolution, GenerationObserver, RunStatus,
};
use crate::config::RunConfig;
use crate::diagnostics::{History, OutcomeTally};
use crate::error::{ConfigError, EvoResult};
use crate::fitness::benchmarks::{Benchmark, BenchmarkKind};
use crate::fitness::traits::Objective;
use crate::population::population::{init_population, Population};
use crate::termination::{check_stopping, RunOutcome};

/// The run in progress and the settings it was started with
#[derive(Clone, Debug)]
struct ActiveRun {
    config: RunConfig,
    population: Population,
    history: History,
}

/// Stateful optimizer session
///
/// Settings changed with [`Session::set_config`] take effect when the next
/// run starts; the run in progress keeps the settings it started with.
pub struct Session<R> {
    objective: Box<dyn Objective>,
    config: RunConfig,
    run: Option<ActiveRun>,
    tally: OutcomeTally,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Create a session for `objective`
    pub fn new(objective: Box<dyn Objective>, config: RunConfig, rng: R) -> EvoResult<Self> {
        config.validate_for(objective.as_ref())?;
        Ok(Self {
            objective,
            config,
            run: None,
            tally: OutcomeTally::new(),
            rng,
        })
    }

    /// Create a session for a catalog function with default settings
    pub fn for_benchmark(kind: BenchmarkKind, rng: R) -> EvoResult<Self> {
        let benchmark = Benchmark::new(kind);
        let config = RunConfig::for_benchmark(&benchmark);
        Self::new(Box::new(benchmark), config, rng)
    }

    /// The objective being minimized
    pub fn objective(&self) -> &dyn Objective {
        self.objective.as_ref()
    }

    /// Settings for the next run
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Current population, if a run is in progress
    pub fn population(&self) -> Option<&Population> {
        self.run.as_ref().map(|run| &run.population)
    }

    /// Statistics of the run in progress
    pub fn history(&self) -> Option<&History> {
        self.run.as_ref().map(|run| &run.history)
    }

    /// Outcomes of every run finished in this session
    pub fn tally(&self) -> &OutcomeTally {
        &self.tally
    }

    /// Outcome the current population would be classified with, if any
    pub fn status(&self) -> Option<RunOutcome> {
        self.run
            .as_ref()
            .and_then(|run| check_stopping(&run.population, &run.config, self.objective.as_ref()))
    }

    /// Replace the settings used from the next run on
    pub fn set_config(&mut self, config: RunConfig) -> Result<(), ConfigError> {
        config.validate_for(self.objective.as_ref())?;
        self.config = config;
        Ok(())
    }

    /// Switch to another objective, discarding the run in progress
    pub fn select_objective(
        &mut self,
        objective: Box<dyn Objective>,
        config: RunConfig,
    ) -> Result<(), ConfigError> {
        config.validate_for(objective.as_ref())?;
        debug!(objective = objective.name(), "objective selected");
        self.objective = objective;
        self.config = config;
        self.run = None;
        Ok(())
    }

    /// Switch to a catalog function, keeping the GA settings but taking the
    /// function's sampling box
    pub fn select_benchmark(&mut self, kind: BenchmarkKind) -> Result<(), ConfigError> {
        let benchmark = Benchmark::new(kind);
        let config = self
            .config
            .clone()
            .with_init(benchmark.init_mean(), benchmark.init_radius());
        self.select_objective(Box::new(benchmark), config)
    }

    /// Reset the outcome tally
    pub fn clear_stats(&mut self) {
        self.tally.clear();
    }

    /// Drop the run in progress without counting it
    pub fn abandon_run(&mut self) {
        self.run = None;
    }

    /// Start a new run, replacing any run in progress
    pub fn generate_initial(&mut self) -> EvoResult<&Population> {
        let run = self.start_run()?;
        Ok(&self.run.insert(run).population)
    }

    /// Advance the current run by one generation
    ///
    /// Starts a run first when none is in progress.
    pub fn next_generation(&mut self) -> EvoResult<&Population> {
        let run = self.take_or_start_run()?;
        let next = advance_generation(
            &run.population,
            &run.config,
            self.objective.as_ref(),
            &mut self.rng,
        );
        let run = self.run.insert(run);
        let next = next?;
        run.history.record(&next);
        run.population = next;
        Ok(&run.population)
    }

    /// Finish the current run (starting one if needed) and count its outcome
    ///
    /// The finished population is discarded. An error also discards the run.
    pub fn run_to_end(&mut self) -> EvoResult<RunOutcome> {
        let run = self.take_or_start_run()?;
        let engine = Evolution::new(run.config, self.objective.as_ref())?;

        let mut population = run.population;
        let outcome = loop {
            if let Some(outcome) = engine.check(&population) {
                break outcome;
            }
            population = engine.advance(&population, &mut self.rng)?;
        };

        info!(
            objective = self.objective.name(),
            %outcome,
            generations = population.generation(),
            "run finished"
        );
        self.tally.record(outcome);
        Ok(outcome)
    }

    /// Finish the current run unless `observer` interrupts it
    ///
    /// A cancelled run stays in progress and can be resumed later.
    pub fn run_to_end_observed<O>(&mut self, observer: &mut O) -> EvoResult<RunStatus>
    where
        O: GenerationObserver + ?Sized,
    {
        let run = self.take_or_start_run()?;
        let engine = Evolution::new(run.config.clone(), self.objective.as_ref())?;
        let report = engine.continue_observed(run.population, run.history, &mut self.rng, observer)?;

        match report.status {
            RunStatus::Finished(outcome) => self.tally.record(outcome),
            RunStatus::Cancelled => {
                self.run = Some(ActiveRun {
                    config: run.config,
                    population: report.population,
                    history: report.history,
                })
            }
        }
        Ok(report.status)
    }

    /// Run `run_count` complete runs and return their tally
    ///
    /// The session tally accumulates the same outcomes. A run already in
    /// progress is finished as the first of the batch.
    pub fn run_many(&mut self, run_count: usize) -> EvoResult<OutcomeTally> {
        let mut batch = OutcomeTally::new();
        for _ in 0..run_count {
            batch.record(self.run_to_end()?);
        }
        info!(objective = self.objective.name(), tally = %batch, "batch finished");
        Ok(batch)
    }

    /// Run a batch that `observer` may cancel
    pub fn run_many_observed<O>(&mut self, run_count: usize, observer: &mut O) -> EvoResult<BatchReport>
    where
        O: GenerationObserver + ?Sized,
    {
        let mut batch = OutcomeTally::new();
        let mut cancelled = false;

        for _ in 0..run_count {
            match self.run_to_end_observed(observer)? {
                RunStatus::Finished(outcome) => {
                    batch.record(outcome);
                    if let ControlFlow::Break(()) = observer.on_run_complete(outcome, &batch) {
                        cancelled = batch.total() < run_count;
                        break;
                    }
                }
                RunStatus::Cancelled => {
                    cancelled = true;
                    break;
                }
            }
        }

        info!(objective = self.objective.name(), tally = %batch, cancelled, "batch finished");
        Ok(BatchReport {
            tally: batch,
            requested: run_count,
            cancelled,
        })
    }

    fn start_run(&mut self) -> EvoResult<ActiveRun> {
        let config = self.config.clone();
        let population = init_population(&config, self.objective.as_ref(), &mut self.rng)?;
        let mut history = History::new();
        history.record(&population);
        debug!(
            objective = self.objective.name(),
            size = population.len(),
            "initial population generated"
        );
        Ok(ActiveRun {
            config,
            population,
            history,
        })
    }

    fn take_or_start_run(&mut self) -> EvoResult<ActiveRun> {
        match self.run.take() {
            Some(run) => Ok(run),
            None => self.start_run(),
        }
    }
}
