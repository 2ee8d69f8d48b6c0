//! Run configuration
//!
//! A [`RunConfig`] is an immutable description of one optimization attempt.
//! It is validated once, before any run starts; nothing in the engine clamps
//! out-of-range values.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fitness::benchmarks::Benchmark;
use crate::fitness::traits::Objective;

/// Parameters of a genetic-algorithm run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of individuals per generation (even, for crossover pairing)
    pub population_size: usize,
    /// Probability that a selected pair undergoes crossover
    pub crossover_probability: f64,
    /// SBX distribution index `n`; larger values keep children closer to parents
    pub sbx_distribution_index: f64,
    /// Generation limit used by the exceeded-generations outcome
    pub max_generations: usize,
    /// Per-coordinate convergence tolerance on the point
    pub epsilon_x: f64,
    /// Convergence tolerance on the objective value
    pub epsilon_y: f64,
    /// Centre of the initial sampling box
    pub init_mean: Vec<f64>,
    /// Half-width of the initial sampling box, per coordinate
    pub init_radius: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            crossover_probability: 1.0,
            sbx_distribution_index: 2.0,
            max_generations: 200,
            epsilon_x: 1e-5,
            epsilon_y: 1e-5,
            init_mean: Vec::new(),
            init_radius: 0.0,
        }
    }
}

impl RunConfig {
    /// Default parameters with the sampling box recommended by `benchmark`
    pub fn for_benchmark(benchmark: &Benchmark) -> Self {
        Self::default().with_init(benchmark.init_mean(), benchmark.init_radius())
    }

    /// Set the population size
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the crossover probability
    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = probability;
        self
    }

    /// Set the SBX distribution index
    pub fn with_sbx_distribution_index(mut self, n: f64) -> Self {
        self.sbx_distribution_index = n;
        self
    }

    /// Set the generation limit
    pub fn with_max_generations(mut self, max: usize) -> Self {
        self.max_generations = max;
        self
    }

    /// Set both convergence tolerances
    pub fn with_epsilons(mut self, epsilon_x: f64, epsilon_y: f64) -> Self {
        self.epsilon_x = epsilon_x;
        self.epsilon_y = epsilon_y;
        self
    }

    /// Set the initial sampling box
    pub fn with_init(mut self, mean: Vec<f64>, radius: f64) -> Self {
        self.init_mean = mean;
        self.init_radius = radius;
        self
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.population_size % 2 != 0 {
            return Err(ConfigError::OddPopulation(self.population_size));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(ConfigError::CrossoverProbability(self.crossover_probability));
        }
        if !self.sbx_distribution_index.is_finite() || self.sbx_distribution_index <= -1.0 {
            return Err(ConfigError::DistributionIndex(self.sbx_distribution_index));
        }
        for (name, value) in [("epsilon_x", self.epsilon_x), ("epsilon_y", self.epsilon_y)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Epsilon { name, value });
            }
        }
        if !self.init_radius.is_finite() || self.init_radius < 0.0 {
            return Err(ConfigError::InitRadius(self.init_radius));
        }
        if self.init_mean.is_empty() {
            return Err(ConfigError::EmptyPoint);
        }
        Ok(())
    }

    /// Check parameter ranges and dimensionality against `objective`
    pub fn validate_for(&self, objective: &dyn Objective) -> Result<(), ConfigError> {
        self.validate()?;
        let expected = objective.dimension();
        for actual in [self.init_mean.len(), objective.optimum_point().len()] {
            if actual != expected {
                return Err(ConfigError::DimensionMismatch { expected, actual });
            }
        }
        Ok(())
    }
}
