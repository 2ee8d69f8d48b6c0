//! Selection operators
//!
//! This module provides the pairwise binary tournament used to build the
//! mating pool.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::operators::traits::SelectionOperator;
use crate::population::individual::Individual;

/// Binary tournament against a randomly permuted partner
///
/// A uniform random permutation `p` of `0..n` is drawn and slot `i` receives
/// the fitter of `individuals[i]` and `individuals[p[i]]`. Every individual is
/// the anchor of exactly one comparison. When `p[i] == i` the anchor meets
/// itself. The comparison is strict, so the partner wins ties.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairwiseTournament;

impl PairwiseTournament {
    /// Create the tournament operator
    pub fn new() -> Self {
        Self
    }

    /// Indices of the selected parents, one per slot
    pub fn select_indices<R: Rng + ?Sized>(
        &self,
        individuals: &[Individual],
        rng: &mut R,
    ) -> Vec<usize> {
        let mut partners: Vec<usize> = (0..individuals.len()).collect();
        partners.shuffle(rng);
        partners
            .into_iter()
            .enumerate()
            .map(|(anchor, partner)| {
                if individuals[anchor].is_better_than(&individuals[partner]) {
                    anchor
                } else {
                    partner
                }
            })
            .collect()
    }
}

impl SelectionOperator for PairwiseTournament {
    fn select_parents<R: Rng + ?Sized>(
        &self,
        individuals: &[Individual],
        rng: &mut R,
    ) -> Vec<Individual> {
        self.select_indices(individuals, rng)
            .into_iter()
            .map(|i| individuals[i].clone())
            .collect()
    }
}

/// Select the mating pool with [`PairwiseTournament`]
pub fn select_parents<R: Rng + ?Sized>(individuals: &[Individual], rng: &mut R) -> Vec<Individual> {
    PairwiseTournament.select_parents(individuals, rng)
}
