//! Objectives and benchmarks
//!
//! This module provides the objective abstraction, the fitness transform and
//! the benchmark catalog.

pub mod benchmarks;
pub mod traits;

pub mod prelude {
    pub use super::benchmarks::*;
    pub use super::traits::*;
}
