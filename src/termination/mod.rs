//! Termination criteria
//!
//! A run ends with exactly one [`RunOutcome`]. The criteria are checked in a
//! fixed priority order against the current population: point convergence,
//! value convergence, population collapse, and finally the generation limit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::fitness::traits::Objective;
use crate::population::population::Population;
use crate::vector;

/// Spread multiplier used by the population-collapse test
pub const COLLAPSE_SPREAD_FACTOR: f64 = 5.0;

/// Why a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The best point is within `epsilon_x` of the optimum in every coordinate
    ConvergedX,
    /// The best value is within `epsilon_y` of the optimum value
    ConvergedY,
    /// The population collapsed before reaching the optimum
    PrematureConvergence,
    /// The generation limit was reached
    ExceededGenerations,
}

impl RunOutcome {
    /// All outcomes in priority order
    pub const ALL: [RunOutcome; 4] = [
        RunOutcome::ConvergedX,
        RunOutcome::ConvergedY,
        RunOutcome::PrematureConvergence,
        RunOutcome::ExceededGenerations,
    ];

    /// Position in [`RunOutcome::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short label for tallies
    pub fn label(self) -> &'static str {
        match self {
            Self::ConvergedX => "x convergence",
            Self::ConvergedY => "y convergence",
            Self::PrematureConvergence => "premature convergence",
            Self::ExceededGenerations => "exceeded # gens",
        }
    }

    /// True for the two outcomes that found the optimum
    pub fn is_success(self) -> bool {
        matches!(self, Self::ConvergedX | Self::ConvergedY)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Evolution state for termination checking
#[derive(Clone, Copy, Debug)]
pub struct EvolutionState<'a> {
    /// Current population
    pub population: &'a Population,
    /// Location of the known optimum
    pub optimum_point: &'a [f64],
    /// Value of the known optimum
    pub optimum_value: f64,
}

impl<'a> EvolutionState<'a> {
    /// Pair a population with the optimum of `objective`
    pub fn new(population: &'a Population, objective: &'a dyn Objective) -> Self {
        Self {
            population,
            optimum_point: objective.optimum_point(),
            optimum_value: objective.optimum_value(),
        }
    }
}

/// Termination criterion trait
pub trait StoppingCriterion: Send + Sync {
    /// Check if the run should end
    fn should_stop(&self, state: &EvolutionState<'_>) -> bool;

    /// The outcome recorded when this criterion fires
    fn outcome(&self) -> RunOutcome;
}

/// Best point within `epsilon_x` of the optimum in every coordinate
#[derive(Clone, Debug)]
pub struct PointConvergence {
    /// Per-coordinate tolerance (inclusive)
    pub epsilon_x: f64,
}

impl StoppingCriterion for PointConvergence {
    fn should_stop(&self, state: &EvolutionState<'_>) -> bool {
        let best = state.population.best();
        vector::max_abs_diff(best.point(), state.optimum_point) <= self.epsilon_x
    }

    fn outcome(&self) -> RunOutcome {
        RunOutcome::ConvergedX
    }
}

/// Best value strictly within `epsilon_y` of the optimum value
#[derive(Clone, Debug)]
pub struct ValueConvergence {
    /// Value tolerance (exclusive)
    pub epsilon_y: f64,
}

impl StoppingCriterion for ValueConvergence {
    fn should_stop(&self, state: &EvolutionState<'_>) -> bool {
        (state.population.best().value() - state.optimum_value).abs() < self.epsilon_y
    }

    fn outcome(&self) -> RunOutcome {
        RunOutcome::ConvergedY
    }
}

/// Population spread has shrunk below the point tolerance
///
/// Fires when `5 * std_dev` is at most `epsilon_x` in every coordinate.
#[derive(Clone, Debug)]
pub struct PopulationCollapse {
    /// Per-coordinate tolerance
    pub epsilon_x: f64,
}

impl StoppingCriterion for PopulationCollapse {
    fn should_stop(&self, state: &EvolutionState<'_>) -> bool {
        state
            .population
            .spread()
            .iter()
            .all(|sd| sd * COLLAPSE_SPREAD_FACTOR <= self.epsilon_x)
    }

    fn outcome(&self) -> RunOutcome {
        RunOutcome::PrematureConvergence
    }
}

/// Generation counter has reached the limit
///
/// With a limit of `n` a run performs at most `n` advances.
#[derive(Clone, Debug)]
pub struct MaxGenerations(pub usize);

impl StoppingCriterion for MaxGenerations {
    fn should_stop(&self, state: &EvolutionState<'_>) -> bool {
        state.population.generation() >= self.0
    }

    fn outcome(&self) -> RunOutcome {
        RunOutcome::ExceededGenerations
    }
}

/// Ordered set of criteria; the first one that fires decides the outcome
pub struct StoppingRules {
    criteria: Vec<Box<dyn StoppingCriterion>>,
}

impl StoppingRules {
    /// Build rules from an explicit priority list
    pub fn new(criteria: Vec<Box<dyn StoppingCriterion>>) -> Self {
        Self { criteria }
    }

    /// The four standard criteria in priority order
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(vec![
            Box::new(PointConvergence {
                epsilon_x: config.epsilon_x,
            }),
            Box::new(ValueConvergence {
                epsilon_y: config.epsilon_y,
            }),
            Box::new(PopulationCollapse {
                epsilon_x: config.epsilon_x,
            }),
            Box::new(MaxGenerations(config.max_generations)),
        ])
    }

    /// Outcome of the highest-priority criterion that fires, if any
    pub fn evaluate(&self, state: &EvolutionState<'_>) -> Option<RunOutcome> {
        self.criteria
            .iter()
            .find(|c| c.should_stop(state))
            .map(|c| c.outcome())
    }
}

impl fmt::Debug for StoppingRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcomes: Vec<RunOutcome> = self.criteria.iter().map(|c| c.outcome()).collect();
        f.debug_struct("StoppingRules")
            .field("criteria", &outcomes)
            .finish()
    }
}

/// Check the standard stopping criteria for `population`
pub fn check_stopping(
    population: &Population,
    config: &RunConfig,
    objective: &dyn Objective,
) -> Option<RunOutcome> {
    StoppingRules::from_config(config).evaluate(&EvolutionState::new(population, objective))
}

pub mod prelude {
    pub use super::{
        check_stopping, EvolutionState, MaxGenerations, PointConvergence, PopulationCollapse,
        RunOutcome, StoppingCriterion, StoppingRules, ValueConvergence,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::individual::Individual;

    fn population(points: &[(f64, f64)], generation: usize) -> Population {
        let individuals = points
            .iter()
            .map(|&(x, value)| Individual::from_value(vec![x], value, 0.0))
            .collect();
        Population::from_individuals(individuals, generation).unwrap()
    }

    fn state<'a>(pop: &'a Population, optimum: &'a [f64]) -> EvolutionState<'a> {
        EvolutionState {
            population: pop,
            optimum_point: optimum,
            optimum_value: 0.0,
        }
    }

    #[test]
    fn test_point_convergence_is_inclusive() {
        let pop = population(&[(0.5, 1e-3), (2.0, 5.0)], 0);
        let criterion = PointConvergence { epsilon_x: 0.5 };
        assert!(criterion.should_stop(&state(&pop, &[1.0])));
        assert!(!criterion.should_stop(&state(&pop, &[1.1])));
    }

    #[test]
    fn test_value_convergence_is_exclusive() {
        let pop = population(&[(0.0, 0.25), (1.0, 3.0)], 0);
        assert!(!ValueConvergence { epsilon_y: 0.25 }.should_stop(&state(&pop, &[9.0])));
        assert!(ValueConvergence { epsilon_y: 0.5 }.should_stop(&state(&pop, &[9.0])));
    }

    #[test]
    fn test_population_collapse() {
        let tight = population(&[(1.0, 1.0), (1.0 + 1e-6, 1.0)], 0);
        let loose = population(&[(1.0, 1.0), (1.1, 1.0)], 0);
        let criterion = PopulationCollapse { epsilon_x: 1e-5 };
        assert!(criterion.should_stop(&state(&tight, &[0.0])));
        assert!(!criterion.should_stop(&state(&loose, &[0.0])));
    }

    #[test]
    fn test_max_generations_fires_at_limit() {
        let criterion = MaxGenerations(3);
        let before = population(&[(0.0, 1.0)], 2);
        let at = population(&[(0.0, 1.0)], 3);
        assert!(!criterion.should_stop(&state(&before, &[9.0])));
        assert!(criterion.should_stop(&state(&at, &[9.0])));

        let zero = population(&[(0.0, 1.0)], 0);
        assert!(MaxGenerations(0).should_stop(&state(&zero, &[9.0])));
    }

    #[test]
    fn test_priority_order() {
        let config = RunConfig::default()
            .with_epsilons(1e-3, 1e-3)
            .with_max_generations(5);
        let rules = StoppingRules::from_config(&config);

        // everything fires: point convergence wins
        let pop = population(&[(0.0, 0.0), (0.0, 0.0)], 5);
        assert_eq!(rules.evaluate(&state(&pop, &[0.0])), Some(RunOutcome::ConvergedX));

        // value converged far from the optimum point
        assert_eq!(rules.evaluate(&state(&pop, &[1.0])), Some(RunOutcome::ConvergedY));

        // collapsed away from the optimum beats the generation limit
        let pop = population(&[(2.0, 4.0), (2.0, 4.0)], 5);
        assert_eq!(
            rules.evaluate(&state(&pop, &[0.0])),
            Some(RunOutcome::PrematureConvergence)
        );

        let pop = population(&[(2.0, 4.0), (3.0, 9.0)], 5);
        assert_eq!(
            rules.evaluate(&state(&pop, &[0.0])),
            Some(RunOutcome::ExceededGenerations)
        );

        let pop = population(&[(2.0, 4.0), (3.0, 9.0)], 0);
        assert_eq!(rules.evaluate(&state(&pop, &[0.0])), None);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(RunOutcome::ConvergedX.to_string(), "x convergence");
        assert_eq!(RunOutcome::ExceededGenerations.index(), 3);
        assert!(RunOutcome::ConvergedY.is_success());
        assert!(!RunOutcome::PrematureConvergence.is_success());
    }
}
