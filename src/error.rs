//! Error types for sbx-evo
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for invalid run configurations
///
/// These are reported before any run starts and are never clamped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Population size was zero
    #[error("Population size must be positive")]
    EmptyPopulation,

    /// Population size cannot be split into crossover pairs
    #[error("Population size must be even for crossover pairing, got {0}")]
    OddPopulation(usize),

    /// Crossover probability outside [0, 1]
    #[error("Crossover probability must be in [0, 1], got {0}")]
    CrossoverProbability(f64),

    /// SBX distribution index outside its valid range
    #[error("SBX distribution index must be finite and greater than -1, got {0}")]
    DistributionIndex(f64),

    /// A convergence threshold was not a finite positive number
    #[error("{name} must be finite and positive, got {value}")]
    Epsilon { name: &'static str, value: f64 },

    /// Sampling radius was negative or non-finite
    #[error("Initial sampling radius must be finite and non-negative, got {0}")]
    InitRadius(f64),

    /// Sampling mean does not match the objective
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The sampling mean has no coordinates
    #[error("Initial sampling mean must have at least one coordinate")]
    EmptyPoint,
}

/// An objective function failed on a given point
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Objective evaluation failed at {point:?}: {message}")]
pub struct EvaluationError {
    /// The point that was being evaluated
    pub point: Vec<f64>,
    /// Human-readable failure description
    pub message: String,
}

impl EvaluationError {
    /// Create an evaluation error for the given point
    pub fn new(point: &[f64], message: impl Into<String>) -> Self {
        Self {
            point: point.to_vec(),
            message: message.into(),
        }
    }
}

/// Top-level error type for evolution operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolutionError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// Objective evaluation failed
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// Individuals of different dimensionality in one population
    #[error("Individual dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
