//! Population type
//!
//! This module provides the Population container and initial sampling.

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::traits::Objective;
use crate::population::individual::Individual;
use crate::vector;

/// Distance below which the population mean counts as sitting on the optimum
const AXIS_COLLAPSE: f64 = 1e-7;

/// Fitness summary of a generation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitnessStats {
    /// Mean fitness
    pub average: f64,
    /// Best fitness
    pub max: f64,
}

/// Objective value summary of a generation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueStats {
    /// Mean objective value
    pub average: f64,
    /// Lowest objective value
    pub min: f64,
}

/// One generation of individuals with its aggregate statistics
///
/// Statistics are computed once at construction; a population is never
/// modified afterwards. The evolution loop builds a new one each generation.
#[derive(Clone, Debug, Serialize)]
pub struct Population {
    individuals: Vec<Individual>,
    generation: usize,
    mean_point: Vec<f64>,
    fitness_stats: FitnessStats,
    value_stats: ValueStats,
}

impl Population {
    /// Create a population and compute its statistics
    ///
    /// Fails if `individuals` is empty or the points differ in dimension.
    pub fn from_individuals(individuals: Vec<Individual>, generation: usize) -> EvoResult<Self> {
        let first = individuals.first().ok_or(EvolutionError::EmptyPopulation)?;
        let dimension = first.dimension();
        if let Some(bad) = individuals.iter().find(|i| i.dimension() != dimension) {
            return Err(EvolutionError::DimensionMismatch {
                expected: dimension,
                actual: bad.dimension(),
            });
        }

        let n = individuals.len() as f64;
        let mean_point = vector::mean(individuals.iter().map(Individual::point), dimension);

        let mut fitness_sum = 0.0;
        let mut fitness_max = f64::NEG_INFINITY;
        let mut value_sum = 0.0;
        let mut value_min = f64::INFINITY;
        for ind in &individuals {
            fitness_sum += ind.fitness();
            fitness_max = fitness_max.max(ind.fitness());
            value_sum += ind.value();
            value_min = value_min.min(ind.value());
        }

        Ok(Self {
            individuals,
            generation,
            mean_point,
            fitness_stats: FitnessStats {
                average: fitness_sum / n,
                max: fitness_max,
            },
            value_stats: ValueStats {
                average: value_sum / n,
                min: value_min,
            },
        })
    }

    /// Number of completed generations that led to this population
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Always false for a constructed population
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Number of coordinates per individual
    pub fn dimension(&self) -> usize {
        self.mean_point.len()
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    /// Get the underlying individuals
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Take the individuals out of this population
    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    /// Componentwise average of all points
    pub fn mean_point(&self) -> &[f64] {
        &self.mean_point
    }

    /// Average and maximum fitness
    pub fn fitness_stats(&self) -> FitnessStats {
        self.fitness_stats
    }

    /// Average and minimum objective value
    pub fn value_stats(&self) -> ValueStats {
        self.value_stats
    }

    /// The fittest individual; the first one wins ties
    pub fn best(&self) -> &Individual {
        let mut best = &self.individuals[0];
        for ind in &self.individuals[1..] {
            if ind.is_better_than(best) {
                best = ind;
            }
        }
        best
    }

    /// Per-coordinate population standard deviation around the mean point
    pub fn spread(&self) -> Vec<f64> {
        vector::std_dev(self.individuals.iter().map(Individual::point), &self.mean_point)
    }

    /// Unit direction from `optimum` toward the mean point
    ///
    /// Falls back to `fallback` when the mean sits on the optimum. This is the
    /// slice direction a plotting front end draws the population along.
    pub fn view_axis(&self, optimum: &[f64], fallback: &[f64]) -> Vec<f64> {
        let offset = vector::sub(&self.mean_point, optimum);
        let magnitude = vector::norm(&offset);
        if magnitude < AXIS_COLLAPSE {
            fallback.to_vec()
        } else {
            offset.iter().map(|x| x / magnitude).collect()
        }
    }
}

impl std::ops::Index<usize> for Population {
    type Output = Individual;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

/// Sample the initial population
///
/// Each coordinate is drawn independently as `init_mean[i] + U(-1, 1) * init_radius`.
/// Configuration errors are reported before anything is sampled.
pub fn init_population<R: Rng + ?Sized>(
    config: &RunConfig,
    objective: &dyn Objective,
    rng: &mut R,
) -> EvoResult<Population> {
    config.validate_for(objective)?;
    let direction = Uniform::new(-1.0, 1.0);
    let individuals = (0..config.population_size)
        .map(|_| {
            let point = config
                .init_mean
                .iter()
                .map(|m| m + direction.sample(rng) * config.init_radius)
                .collect();
            Individual::evaluate(point, objective)
        })
        .collect::<EvoResult<Vec<_>>>()?;
    Population::from_individuals(individuals, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::fitness::traits::FnObjective;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn v_function() -> FnObjective {
        FnObjective::new("v", vec![0.5], 0.0, |x: &[f64]| (x[0] - 0.5).abs())
    }

    fn individual(point: Vec<f64>, value: f64) -> Individual {
        Individual::from_value(point, value, 0.0)
    }

    #[test]
    fn test_statistics() {
        let pop = Population::from_individuals(
            vec![
                individual(vec![0.0, 2.0], 1.0),
                individual(vec![2.0, 0.0], 3.0),
            ],
            4,
        )
        .unwrap();

        assert_eq!(pop.len(), 2);
        assert_eq!(pop.generation(), 4);
        assert_eq!(pop.mean_point(), &[1.0, 1.0]);
        assert_eq!(pop.value_stats(), ValueStats { average: 2.0, min: 1.0 });
        assert_eq!(pop.fitness_stats().max, 50.0);
        assert_eq!(pop.fitness_stats().average, 37.5);
    }

    #[test]
    fn test_value_min_is_true_minimum() {
        let pop = Population::from_individuals(
            vec![individual(vec![0.0], 5.0), individual(vec![1.0], 7.0)],
            0,
        )
        .unwrap();
        assert_eq!(pop.value_stats().min, 5.0);
    }

    #[test]
    fn test_empty_population_rejected() {
        assert_eq!(
            Population::from_individuals(Vec::new(), 0).unwrap_err(),
            EvolutionError::EmptyPopulation
        );
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        let err = Population::from_individuals(
            vec![individual(vec![0.0], 0.0), individual(vec![0.0, 1.0], 0.0)],
            0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            EvolutionError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn test_best_first_wins_ties() {
        let pop = Population::from_individuals(
            vec![
                individual(vec![0.0], 2.0),
                individual(vec![1.0], 1.0),
                individual(vec![2.0], 1.0),
            ],
            0,
        )
        .unwrap();
        assert_eq!(pop.best().point(), &[1.0]);
    }

    #[test]
    fn test_spread() {
        let pop = Population::from_individuals(
            vec![individual(vec![1.0, 3.0], 0.0), individual(vec![3.0, 3.0], 0.0)],
            0,
        )
        .unwrap();
        let sd = pop.spread();
        assert!((sd[0] - 1.0).abs() < 1e-12);
        assert_eq!(sd[1], 0.0);
    }

    #[test]
    fn test_view_axis() {
        let pop = Population::from_individuals(
            vec![individual(vec![3.0, 4.0], 0.0), individual(vec![3.0, 4.0], 0.0)],
            0,
        )
        .unwrap();
        assert_eq!(pop.view_axis(&[0.0, 0.0], &[1.0, 0.0]), vec![0.6, 0.8]);
        assert_eq!(pop.view_axis(&[3.0, 4.0], &[1.0, 0.0]), vec![1.0, 0.0]);
    }

    #[test]
    fn test_init_population_within_box() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = RunConfig::default().with_init(vec![0.5], 0.5);
        let pop = init_population(&config, &v_function(), &mut rng).unwrap();

        assert_eq!(pop.len(), 20);
        assert_eq!(pop.generation(), 0);
        for ind in pop.iter() {
            assert!(ind.point()[0] >= 0.0 && ind.point()[0] < 1.0);
        }
    }

    #[test]
    fn test_init_population_zero_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = RunConfig::default()
            .with_population_size(4)
            .with_init(vec![0.5], 0.0);
        let pop = init_population(&config, &v_function(), &mut rng).unwrap();
        assert!(pop.iter().all(|i| i.point() == [0.5]));
        assert_eq!(pop.fitness_stats().max, 100.0);
    }

    #[test]
    fn test_init_population_dimension_mismatch() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = RunConfig::default().with_init(vec![0.5, 0.5], 0.5);
        let err = init_population(&config, &v_function(), &mut rng).unwrap_err();
        assert_eq!(
            err,
            EvolutionError::Configuration(ConfigError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        );
    }
}
