//! Operator traits
//!
//! This module defines the operator seams used by the generational loop.

use rand::Rng;

use crate::error::EvoResult;
use crate::fitness::traits::Objective;
use crate::population::individual::{Individual, IndividualPair};

/// Selection operator trait
///
/// Produces the mating pool for one generation.
pub trait SelectionOperator: Send + Sync {
    /// Select as many parents as there are individuals, in pairing order
    fn select_parents<R: Rng + ?Sized>(
        &self,
        individuals: &[Individual],
        rng: &mut R,
    ) -> Vec<Individual>;
}

/// Crossover operator trait
///
/// Combines two parents into two children.
pub trait CrossoverOperator: Send + Sync {
    /// Apply crossover to two parents and produce two evaluated offspring
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        objective: &dyn Objective,
        rng: &mut R,
    ) -> EvoResult<IndividualPair>;

    /// Get the probability of crossover being applied to a pair
    fn crossover_probability(&self) -> f64 {
        1.0
    }
}
