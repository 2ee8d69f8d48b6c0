//! Genetic operators
//!
//! This module provides selection and crossover operators.

pub mod crossover;
pub mod selection;
pub mod traits;

pub mod prelude {
    pub use super::crossover::*;
    pub use super::selection::*;
    pub use super::traits::*;
}
