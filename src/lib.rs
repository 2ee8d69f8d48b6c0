//! # sbx-evo
//!
//! A real-coded genetic algorithm for minimizing functions with a known
//! optimum, built to study how and why runs converge.
//!
//! ## Core Concepts
//!
//! - **Fitness transform**: objective values map to `100 / (1 + value - y_min)`,
//!   so the known optimum always scores 100
//! - **Variation**: pairwise binary tournament selection followed by
//!   simulated binary crossover (SBX); there is no mutation
//! - **Outcome classification**: every run ends as x convergence,
//!   y convergence, premature convergence or exceeding the generation limit,
//!   and batches tally these outcomes
//!
//! ## Quick Start
//!
//! ```rust
//! use sbx_evo::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let v = Benchmark::new(BenchmarkKind::V);
//! let config = RunConfig::for_benchmark(&v).with_epsilons(1e-4, 1e-4);
//!
//! let engine = Evolution::new(config, &v)?;
//! let tally = engine.run_batch(10, &mut rng)?;
//! assert_eq!(tally.total(), 10);
//! # Ok::<(), EvolutionError>(())
//! ```

pub mod algorithms;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod operators;
pub mod population;
pub mod termination;
pub mod vector;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::config::RunConfig;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::termination::prelude::*;
}
