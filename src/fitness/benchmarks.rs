//! Benchmark objective functions
//!
//! This module provides the catalog of test functions used to study
//! convergence behaviour. Every entry knows its global minimum and a
//! recommended sampling region for the initial population.

use std::f64::consts::PI;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;
use crate::fitness::traits::Objective;

/// Identifier of a catalog function
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BenchmarkKind {
    /// `|x - 0.5|`
    V,
    /// V function with a 0.1 step on the left of the optimum
    VCliff,
    /// Two equally deep Gaussian wells at 0.25 and 0.75
    BimodalEqual,
    /// A narrow deep well at 0.2 and a wide shallow one at 0.6
    BimodalUnequal,
    /// Sum of four inverse-distance poles in the unit square
    Pole,
    /// Sphere in three dimensions
    DeJong1,
    /// Rosenbrock valley in two dimensions
    DeJong2,
    /// Step function in five dimensions
    DeJong3,
    /// Quartic with uniform noise in thirty dimensions
    DeJong4,
    /// Shekel's foxholes
    DeJong5,
    /// Rastrigin in twenty dimensions
    Rastrigin,
    /// A parabola with a blocking ridge of inverse wells
    Blocked,
}

impl BenchmarkKind {
    /// All catalog entries, in presentation order
    pub const ALL: [BenchmarkKind; 12] = [
        BenchmarkKind::V,
        BenchmarkKind::VCliff,
        BenchmarkKind::BimodalEqual,
        BenchmarkKind::BimodalUnequal,
        BenchmarkKind::Pole,
        BenchmarkKind::DeJong1,
        BenchmarkKind::DeJong2,
        BenchmarkKind::DeJong3,
        BenchmarkKind::DeJong4,
        BenchmarkKind::DeJong5,
        BenchmarkKind::Rastrigin,
        BenchmarkKind::Blocked,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::V => "V function",
            Self::VCliff => "V-cliff function",
            Self::BimodalEqual => "bimodal (equal)",
            Self::BimodalUnequal => "bimodal (unequal)",
            Self::Pole => "pole function",
            Self::DeJong1 => "DeJong 1",
            Self::DeJong2 => "DeJong 2",
            Self::DeJong3 => "DeJong 3",
            Self::DeJong4 => "DeJong 4",
            Self::DeJong5 => "DeJong 5",
            Self::Rastrigin => "Rastrigin",
            Self::Blocked => "blocked function",
        }
    }

    /// Number of coordinates
    pub fn dimension(self) -> usize {
        match self {
            Self::V | Self::VCliff | Self::BimodalEqual | Self::BimodalUnequal => 1,
            Self::Pole | Self::DeJong2 | Self::DeJong5 | Self::Blocked => 2,
            Self::DeJong1 => 3,
            Self::DeJong3 => 5,
            Self::DeJong4 => 30,
            Self::Rastrigin => 20,
        }
    }

    fn optimum_point(self) -> Vec<f64> {
        match self {
            Self::V | Self::VCliff => vec![0.5],
            Self::BimodalEqual => vec![0.25],
            Self::BimodalUnequal => vec![0.2],
            Self::Pole => vec![0.8, 0.8],
            Self::DeJong1 => vec![0.0; 3],
            Self::DeJong2 => vec![1.0, 1.0],
            Self::DeJong3 => vec![-5.12; 5],
            Self::DeJong4 => vec![0.0; 30],
            Self::DeJong5 => vec![-32.0, -32.0],
            Self::Rastrigin => vec![0.0; 20],
            Self::Blocked => vec![0.4, 0.45],
        }
    }

    fn init_radius(self) -> f64 {
        match self {
            Self::V | Self::VCliff | Self::BimodalEqual | Self::BimodalUnequal => 0.5,
            Self::Pole => 1.0,
            Self::DeJong1 => 5.12,
            Self::DeJong2 => 2.048,
            Self::DeJong3 => 5.12,
            Self::DeJong4 => 1.28,
            Self::DeJong5 => 65.536,
            Self::Rastrigin => 6.0,
            Self::Blocked => 0.5,
        }
    }

    /// Whether evaluations add uniform noise in [0, 1)
    pub fn is_noisy(self) -> bool {
        matches!(self, Self::DeJong4)
    }

    /// Noise-free function value; `x` must have `self.dimension()` coordinates
    fn value(self, x: &[f64]) -> f64 {
        match self {
            Self::V => (x[0] - 0.5).abs(),
            Self::VCliff => {
                if x[0] < 0.5 {
                    0.6 - x[0]
                } else {
                    x[0] - 0.5
                }
            }
            Self::BimodalEqual => {
                if x[0] <= 0.5 {
                    -(-(x[0] - 0.25).powi(2) / 0.01).exp()
                } else {
                    -(-(x[0] - 0.75).powi(2) / 0.01).exp()
                }
            }
            Self::BimodalUnequal => {
                if x[0] <= 0.3 {
                    -(-(x[0] - 0.2).powi(2) / 0.00016).exp()
                } else {
                    -0.5 * (-(x[0] - 0.6).powi(2) / 0.16).exp()
                }
            }
            Self::Pole => pole(x[0], x[1]),
            Self::DeJong1 => x.iter().map(|xi| xi * xi).sum(),
            Self::DeJong2 => 100.0 * (x[1] - x[0] * x[0]).powi(2) + (x[0] - 1.0).powi(2),
            Self::DeJong3 => x.iter().map(|xi| (xi.floor() + 6.0).abs()).sum(),
            Self::DeJong4 => x
                .iter()
                .enumerate()
                .map(|(i, xi)| (i + 1) as f64 * xi.powi(4))
                .sum(),
            Self::DeJong5 => foxholes(x[0], x[1]),
            Self::Rastrigin => x
                .iter()
                .map(|xi| xi * xi + 10.0 * (1.0 - (2.0 * PI * xi).cos()))
                .sum(),
            Self::Blocked => blocked(x[0], x[1]),
        }
    }
}

fn pole(x: f64, y: f64) -> f64 {
    const XI: [f64; 4] = [0.4, 0.3, 0.7, 0.8];
    const YI: [f64; 4] = [0.3, 0.7, 0.2, 0.8];
    const CI: [f64; 4] = [1.0, 1.0, 1.0, 1.125];
    const HI: [f64; 4] = [0.1, 0.1, 0.1, 0.075];
    let total: f64 = (0..4)
        .map(|i| {
            let r2 = HI[i].powi(2) + (x - XI[i]).powi(2) + (y - YI[i]).powi(2);
            CI[i] * HI[i] / r2.powf(1.5)
        })
        .sum();
    -total
}

fn foxholes(x: f64, y: f64) -> f64 {
    let total: f64 = (0..25)
        .map(|j| {
            let a0 = ((j % 5) as f64 - 2.0) * 16.0;
            let a1 = ((j / 5) as f64 - 2.0) * 16.0;
            1.0 / ((j + 1) as f64 + (x - a0).powi(6) + (y - a1).powi(6))
        })
        .sum();
    -1.0 + 1.0 / (1.0 / 500.0 + total)
}

fn blocked(x1: f64, x2: f64) -> f64 {
    const AI: [f64; 5] = [0.002, 0.0025, 0.014, 0.003, 0.0028];
    const BI: [f64; 5] = [0.002, 0.0020, 0.003, 0.001, 0.0010];
    const CI: [f64; 5] = [0.1, 0.9, 0.45, 0.27, 0.65];
    const RI: [f64; 5] = [0.0, 0.0, 10.0, 10.0, 10.0];
    let dx2 = (x1 - 0.4).powi(2);
    (0..5).fold(dx2, |total, i| {
        total - AI[i] / (BI[i] + RI[i] * dx2 + (x2 - CI[i]).powi(2))
    })
}

/// A catalog function together with its known optimum and sampling hints
///
/// Noisy functions own their noise generator, seeded from entropy unless
/// [`Benchmark::with_noise_seed`] fixes it.
#[derive(Debug)]
pub struct Benchmark {
    kind: BenchmarkKind,
    optimum_point: Vec<f64>,
    optimum_value: f64,
    noise: Option<Mutex<StdRng>>,
}

impl Clone for Benchmark {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            optimum_point: self.optimum_point.clone(),
            optimum_value: self.optimum_value,
            noise: self.noise.as_ref().map(|rng| {
                let state = rng.lock().unwrap_or_else(PoisonError::into_inner).clone();
                Mutex::new(state)
            }),
        }
    }
}

impl Benchmark {
    /// Build the catalog entry for `kind`
    pub fn new(kind: BenchmarkKind) -> Self {
        let optimum_point = kind.optimum_point();
        let optimum_value = match kind {
            BenchmarkKind::Pole | BenchmarkKind::Blocked => kind.value(&optimum_point),
            BenchmarkKind::BimodalEqual | BenchmarkKind::BimodalUnequal => -1.0,
            _ => 0.0,
        };
        let noise = kind
            .is_noisy()
            .then(|| Mutex::new(StdRng::from_entropy()));
        Self {
            kind,
            optimum_point,
            optimum_value,
            noise,
        }
    }

    /// Reseed the noise generator so evaluations are reproducible
    ///
    /// Has no effect on noise-free functions.
    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        if self.kind.is_noisy() {
            self.noise = Some(Mutex::new(StdRng::seed_from_u64(seed)));
        }
        self
    }

    /// The whole catalog
    pub fn catalog() -> Vec<Benchmark> {
        BenchmarkKind::ALL.iter().copied().map(Benchmark::new).collect()
    }

    /// Look up an entry by its display name
    pub fn by_name(name: &str) -> Option<Benchmark> {
        BenchmarkKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == name)
            .map(Benchmark::new)
    }

    /// Which catalog function this is
    pub fn kind(&self) -> BenchmarkKind {
        self.kind
    }

    /// Recommended centre of the initial sampling box (the optimum itself)
    pub fn init_mean(&self) -> Vec<f64> {
        self.optimum_point.clone()
    }

    /// Recommended half-width of the initial sampling box
    pub fn init_radius(&self) -> f64 {
        self.kind.init_radius()
    }

    /// Unit direction used to draw one-dimensional slices of the function
    pub fn axis(&self) -> Vec<f64> {
        let mut axis = vec![0.0; self.kind.dimension()];
        axis[0] = 1.0;
        axis
    }
}

impl Objective for Benchmark {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn dimension(&self) -> usize {
        self.kind.dimension()
    }

    fn evaluate(&self, point: &[f64]) -> Result<f64, EvaluationError> {
        if point.len() != self.kind.dimension() {
            return Err(EvaluationError::new(
                point,
                format!(
                    "{} expects {} coordinates",
                    self.kind.name(),
                    self.kind.dimension()
                ),
            ));
        }
        let value = self.kind.value(point);
        Ok(match &self.noise {
            Some(rng) => {
                let noise: f64 = rng.lock().unwrap_or_else(PoisonError::into_inner).gen();
                value + noise
            }
            None => value,
        })
    }

    fn optimum_point(&self) -> &[f64] {
        &self.optimum_point
    }

    fn optimum_value(&self) -> f64 {
        self.optimum_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(kind: BenchmarkKind, x: &[f64]) -> f64 {
        Benchmark::new(kind).evaluate(x).unwrap()
    }

    #[test]
    fn test_catalog_is_consistent() {
        let catalog = Benchmark::catalog();
        assert_eq!(catalog.len(), 12);
        for b in &catalog {
            assert_eq!(b.optimum_point().len(), b.dimension(), "{}", b.name());
            assert_eq!(b.init_mean().len(), b.dimension(), "{}", b.name());
            assert_eq!(b.axis().len(), b.dimension(), "{}", b.name());
            assert!(b.init_radius() > 0.0);
        }
    }

    #[test]
    fn test_known_optima() {
        for kind in BenchmarkKind::ALL {
            if kind == BenchmarkKind::DeJong4 {
                continue;
            }
            let b = Benchmark::new(kind);
            let at_opt = b.evaluate(b.optimum_point()).unwrap();
            assert!(
                (at_opt - b.optimum_value()).abs() < 1e-2,
                "{}: f(opt) = {}, expected {}",
                b.name(),
                at_opt,
                b.optimum_value()
            );
        }
    }

    #[test]
    fn test_v_functions() {
        assert_eq!(eval(BenchmarkKind::V, &[0.5]), 0.0);
        assert_eq!(eval(BenchmarkKind::V, &[1.0]), 0.5);
        assert!((eval(BenchmarkKind::VCliff, &[0.4]) - 0.2).abs() < 1e-12);
        assert!((eval(BenchmarkKind::VCliff, &[0.7]) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_bimodal_equal_is_symmetric() {
        let left = eval(BenchmarkKind::BimodalEqual, &[0.25]);
        let right = eval(BenchmarkKind::BimodalEqual, &[0.75]);
        assert!((left - right).abs() < 1e-12);
        assert!((left + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dejong_functions() {
        assert_eq!(eval(BenchmarkKind::DeJong1, &[1.0, 2.0, 2.0]), 9.0);
        assert_eq!(eval(BenchmarkKind::DeJong2, &[1.0, 1.0]), 0.0);
        assert_eq!(eval(BenchmarkKind::DeJong3, &[-5.5; 5]), 0.0);
        assert_eq!(eval(BenchmarkKind::DeJong3, &[0.5; 5]), 30.0);
        let quartic = eval(BenchmarkKind::DeJong4, &[0.0; 30]);
        assert!((0.0..1.0).contains(&quartic));
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let a = Benchmark::new(BenchmarkKind::DeJong4).with_noise_seed(7);
        let b = Benchmark::new(BenchmarkKind::DeJong4).with_noise_seed(7);
        let x = [0.5; 30];
        let first: Vec<f64> = (0..5).map(|_| a.evaluate(&x).unwrap()).collect();
        let second: Vec<f64> = (0..5).map(|_| b.evaluate(&x).unwrap()).collect();
        assert_eq!(first, second);
        assert!(first.windows(2).any(|w| w[0] != w[1]));

        // a clone continues from the same noise state
        let c = a.clone();
        assert_eq!(a.evaluate(&x).unwrap(), c.evaluate(&x).unwrap());

        let plain = Benchmark::new(BenchmarkKind::DeJong1).with_noise_seed(7);
        assert_eq!(plain.evaluate(&[1.0, 2.0, 2.0]).unwrap(), 9.0);
    }

    #[test]
    fn test_rastrigin_origin() {
        assert!(eval(BenchmarkKind::Rastrigin, &[0.0; 20]).abs() < 1e-12);
        assert!(eval(BenchmarkKind::Rastrigin, &[0.5; 20]) > 0.0);
    }

    #[test]
    fn test_blocked_uses_second_coordinate() {
        let a = eval(BenchmarkKind::Blocked, &[0.4, 0.45]);
        let b = eval(BenchmarkKind::Blocked, &[0.4, 0.9]);
        assert!(a < b);
    }

    #[test]
    fn test_wrong_dimension_is_evaluation_error() {
        let err = Benchmark::new(BenchmarkKind::Pole).evaluate(&[0.1]).unwrap_err();
        assert_eq!(err.point, vec![0.1]);
    }

    #[test]
    fn test_by_name() {
        let b = Benchmark::by_name("DeJong 2").unwrap();
        assert_eq!(b.kind(), BenchmarkKind::DeJong2);
        assert!(Benchmark::by_name("nope").is_none());
    }
}
