//! Individual type
//!
//! This module provides the Individual type: an evaluated point together with
//! its objective value and derived fitness.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{EvaluationError, EvoResult};
use crate::fitness::traits::{fitness_from_value, Objective};

/// A candidate solution
///
/// The objective is evaluated exactly once, at construction. Individuals are
/// immutable; a changed point means a new individual.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    point: Vec<f64>,
    value: f64,
    fitness: f64,
}

impl Individual {
    /// Evaluate `objective` at `point` and derive the fitness
    ///
    /// Evaluation errors are propagated unchanged. A NaN value is reported as
    /// an evaluation error since it cannot be ranked.
    pub fn evaluate(point: Vec<f64>, objective: &dyn Objective) -> EvoResult<Self> {
        let value = objective.evaluate(&point)?;
        if value.is_nan() {
            return Err(EvaluationError::new(&point, "objective returned NaN").into());
        }
        Ok(Self::from_value(point, value, objective.optimum_value()))
    }

    /// Build an individual from an already known objective value
    pub fn from_value(point: Vec<f64>, value: f64, y_min: f64) -> Self {
        Self {
            point,
            value,
            fitness: fitness_from_value(value, y_min),
        }
    }

    /// Coordinates of this individual
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Raw objective value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Selection fitness (higher is better)
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Number of coordinates
    pub fn dimension(&self) -> usize {
        self.point.len()
    }

    /// Strictly fitter than `other`
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.fitness > other.fitness
    }

    /// Take the point out of this individual
    pub fn into_point(self) -> Vec<f64> {
        self.point
    }
}

impl PartialOrd for Individual {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.fitness.partial_cmp(&other.fitness)
    }
}

/// A pair of individuals (for crossover results)
pub type IndividualPair = (Individual, Individual);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::FnObjective;

    fn v_function() -> FnObjective {
        FnObjective::new("v", vec![0.5], 0.0, |x: &[f64]| (x[0] - 0.5).abs())
    }

    #[test]
    fn test_evaluate() {
        let ind = Individual::evaluate(vec![1.5], &v_function()).unwrap();
        assert_eq!(ind.point(), &[1.5]);
        assert_eq!(ind.value(), 1.0);
        assert_eq!(ind.fitness(), 50.0);
        assert_eq!(ind.dimension(), 1);
    }

    #[test]
    fn test_fitness_uses_known_minimum() {
        let shifted = FnObjective::new("shifted", vec![0.0], -3.0, |x: &[f64]| x[0] * x[0] - 3.0);
        let ind = Individual::evaluate(vec![0.0], &shifted).unwrap();
        assert_eq!(ind.fitness(), 100.0);
    }

    #[test]
    fn test_evaluation_error_propagates() {
        let failing = FnObjective::fallible("failing", vec![0.0], 0.0, |x: &[f64]| {
            Err(EvaluationError::new(x, "domain violation"))
        });
        let err = Individual::evaluate(vec![2.0], &failing).unwrap_err();
        assert!(matches!(err, crate::error::EvolutionError::Evaluation(_)));
    }

    #[test]
    fn test_nan_is_evaluation_error() {
        let nan = FnObjective::new("nan", vec![0.0], 0.0, |_: &[f64]| f64::NAN);
        assert!(Individual::evaluate(vec![0.0], &nan).is_err());
    }

    #[test]
    fn test_is_better_than() {
        let a = Individual::from_value(vec![0.0], 0.1, 0.0);
        let b = Individual::from_value(vec![1.0], 0.2, 0.0);
        assert!(a.is_better_than(&b));
        assert!(!b.is_better_than(&a));
        assert!(!a.is_better_than(&a.clone()));
        assert!(a > b);
    }

    #[test]
    fn test_into_point() {
        let ind = Individual::from_value(vec![1.0, 2.0], 0.0, 0.0);
        assert_eq!(ind.into_point(), vec![1.0, 2.0]);
    }
}
