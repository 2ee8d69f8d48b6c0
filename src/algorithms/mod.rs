//! Evolutionary algorithms
//!
//! This module provides the generational GA engine and the interactive
//! session built on top of it.

pub mod generational;
pub mod session;

pub mod prelude {
    pub use super::generational::*;
    pub use super::session::*;
}
