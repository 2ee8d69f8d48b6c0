//! Objective traits
//!
//! This module defines the objective abstraction consumed by the engine and
//! the transform from raw objective values to selection fitness.

use std::fmt;

use crate::error::EvaluationError;

/// Scale of the fitness transform: a point at the known optimum scores this
pub const FITNESS_SCALE: f64 = 100.0;

/// An objective function to be minimized
///
/// Besides the callable itself, an objective carries its known global
/// minimum, which the engine needs both for the fitness transform and for
/// classifying how a run ended.
pub trait Objective: Send + Sync {
    /// Human-readable name
    fn name(&self) -> &str;

    /// Number of coordinates a point must have
    fn dimension(&self) -> usize;

    /// Evaluate the objective at `point` (lower is better)
    fn evaluate(&self, point: &[f64]) -> Result<f64, EvaluationError>;

    /// Location of the known global minimum
    fn optimum_point(&self) -> &[f64];

    /// Value of the known global minimum
    fn optimum_value(&self) -> f64;
}

/// Map a raw objective value to a positive fitness score
///
/// `fitness = 100 / (1 + value - y_min)`; strictly decreasing in `value`
/// and positive whenever `value >= y_min`.
pub fn fitness_from_value(value: f64, y_min: f64) -> f64 {
    FITNESS_SCALE / (1.0 + value - y_min)
}

type ObjectiveFn = dyn Fn(&[f64]) -> Result<f64, EvaluationError> + Send + Sync;

/// A closure-backed objective
///
/// # Examples
///
/// ```
/// use sbx_evo::prelude::*;
///
/// let v = FnObjective::new("V function", vec![0.5], 0.0, |x: &[f64]| (x[0] - 0.5).abs());
/// assert_eq!(v.dimension(), 1);
/// assert_eq!(v.evaluate(&[1.0]).unwrap(), 0.5);
/// ```
pub struct FnObjective {
    name: String,
    optimum_point: Vec<f64>,
    optimum_value: f64,
    f: Box<ObjectiveFn>,
}

impl FnObjective {
    /// Wrap an infallible function
    pub fn new<F>(
        name: impl Into<String>,
        optimum_point: Vec<f64>,
        optimum_value: f64,
        f: F,
    ) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::fallible(name, optimum_point, optimum_value, move |x: &[f64]| Ok(f(x)))
    }

    /// Wrap a function that may reject points
    pub fn fallible<F>(
        name: impl Into<String>,
        optimum_point: Vec<f64>,
        optimum_value: f64,
        f: F,
    ) -> Self
    where
        F: Fn(&[f64]) -> Result<f64, EvaluationError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            optimum_point,
            optimum_value,
            f: Box::new(f),
        }
    }
}

impl fmt::Debug for FnObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObjective")
            .field("name", &self.name)
            .field("optimum_point", &self.optimum_point)
            .field("optimum_value", &self.optimum_value)
            .finish_non_exhaustive()
    }
}

impl Objective for FnObjective {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.optimum_point.len()
    }

    fn evaluate(&self, point: &[f64]) -> Result<f64, EvaluationError> {
        (self.f)(point)
    }

    fn optimum_point(&self) -> &[f64] {
        &self.optimum_point
    }

    fn optimum_value(&self) -> f64 {
        self.optimum_value
    }
}
