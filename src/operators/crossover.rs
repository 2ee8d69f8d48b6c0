//! Crossover operators
//!
//! This module provides simulated binary crossover for real-valued points.

use rand::Rng;
use tracing::trace;

use crate::config::RunConfig;
use crate::error::{ConfigError, EvoResult};
use crate::fitness::traits::Objective;
use crate::operators::traits::CrossoverOperator;
use crate::population::individual::{Individual, IndividualPair};

/// Simulated Binary Crossover (SBX)
///
/// Children are placed symmetrically around the parents' midpoint, at a
/// distance of `beta * |p1 - p2| / 2` per coordinate. The spread factor
/// `beta` is drawn independently for every coordinate of every crossover
/// event, and concentrates around 1 as the distribution index grows.
///
/// Reference: Deb, K., & Agrawal, R. B. (1995). Simulated Binary Crossover
/// for Continuous Search Space.
#[derive(Clone, Debug, PartialEq)]
pub struct SbxCrossover {
    /// Distribution index `n`
    pub distribution_index: f64,
    /// Probability that a pair is crossed at all
    pub crossover_probability: f64,
}

impl SbxCrossover {
    /// Create an SBX operator
    pub fn new(distribution_index: f64, crossover_probability: f64) -> Result<Self, ConfigError> {
        if !distribution_index.is_finite() || distribution_index <= -1.0 {
            return Err(ConfigError::DistributionIndex(distribution_index));
        }
        if !(0.0..=1.0).contains(&crossover_probability) {
            return Err(ConfigError::CrossoverProbability(crossover_probability));
        }
        Ok(Self {
            distribution_index,
            crossover_probability,
        })
    }

    /// Create the operator described by a run configuration
    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        Self::new(config.sbx_distribution_index, config.crossover_probability)
    }

    /// Compute the spread factor β from a uniform draw `u` in [0, 1)
    ///
    /// `(2u)^(1/(n+1))` below one half, `(2u - 1)^(-1/(n+1))` otherwise.
    pub fn spread_factor(&self, u: f64) -> f64 {
        let exponent = 1.0 / (self.distribution_index + 1.0);
        if u < 0.5 {
            (2.0 * u).powf(exponent)
        } else {
            (2.0 * u - 1.0).powf(-exponent)
        }
    }

    /// Draw a spread factor
    ///
    /// A draw of exactly one half would give an infinite β and is redrawn.
    fn sample_beta<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        loop {
            let u: f64 = rng.gen();
            if u != 0.5 {
                return self.spread_factor(u);
            }
        }
    }

    /// Child points for one crossover event
    pub fn cross_points<R: Rng + ?Sized>(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        rng: &mut R,
    ) -> (Vec<f64>, Vec<f64>) {
        let mut child1 = Vec::with_capacity(parent1.len());
        let mut child2 = Vec::with_capacity(parent1.len());

        for (&x1, &x2) in parent1.iter().zip(parent2) {
            let beta = self.sample_beta(rng);
            let mean = (x1 + x2) / 2.0;
            let gap = (x1 - x2).abs();
            // identical genes stay put even when beta is huge
            let delta = if gap == 0.0 { 0.0 } else { beta * gap / 2.0 };
            child1.push(mean + delta);
            child2.push(mean - delta);
        }

        (child1, child2)
    }
}

impl CrossoverOperator for SbxCrossover {
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        objective: &dyn Objective,
        rng: &mut R,
    ) -> EvoResult<IndividualPair> {
        if !rng.gen_bool(self.crossover_probability) {
            trace!("crossover skipped, parents pass through");
            return Ok((parent1.clone(), parent2.clone()));
        }

        let (point1, point2) = self.cross_points(parent1.point(), parent2.point(), rng);
        Ok((
            Individual::evaluate(point1, objective)?,
            Individual::evaluate(point2, objective)?,
        ))
    }

    fn crossover_probability(&self) -> f64 {
        self.crossover_probability
    }
}

/// Cross two parents with the SBX settings of `config`
pub fn sbx_cross<R: Rng + ?Sized>(
    parent1: &Individual,
    parent2: &Individual,
    config: &RunConfig,
    objective: &dyn Objective,
    rng: &mut R,
) -> EvoResult<IndividualPair> {
    SbxCrossover::from_config(config)?.crossover(parent1, parent2, objective, rng)
}
