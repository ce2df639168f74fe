//! Shuffle order generation
//!
//! The controller never reorders the track list itself. While shuffle is on it
//! walks a stored permutation of indices produced here.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces uniformly random permutations of track indices
///
/// Uses the Fisher-Yates shuffle: every permutation is equally likely and
/// generation is linear in the number of tracks.
#[derive(Debug, Clone)]
pub struct ShuffleOrderGenerator {
    rng: StdRng,
}

impl ShuffleOrderGenerator {
    /// Generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator, for tests and reproducible sessions
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a permutation of `0..n`
    ///
    /// Walks from the last index down to 1, swapping each slot with a
    /// uniformly chosen slot at or before it.
    pub fn generate(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = self.rng.gen_range(0..=i);
            order.swap(i, j);
        }
        order
    }
}

impl Default for ShuffleOrderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn is_permutation(order: &[usize], n: usize) -> bool {
        let mut seen = vec![false; n];
        for &i in order {
            if i >= n || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        order.len() == n
    }

    #[test]
    fn empty_and_single() {
        let mut gen = ShuffleOrderGenerator::from_seed(1);
        assert!(gen.generate(0).is_empty());
        assert_eq!(gen.generate(1), vec![0]);
    }

    #[test]
    fn generates_permutations() {
        let mut gen = ShuffleOrderGenerator::from_seed(7);
        for n in 2..64 {
            let order = gen.generate(n);
            assert!(is_permutation(&order, n), "not a permutation: {:?}", order);
        }
    }

    #[test]
    fn same_seed_same_order() {
        let a = ShuffleOrderGenerator::from_seed(42).generate(20);
        let b = ShuffleOrderGenerator::from_seed(42).generate(20);
        assert_eq!(a, b);
    }

    #[test]
    fn all_permutations_of_three_roughly_uniform() {
        let mut gen = ShuffleOrderGenerator::from_seed(2024);
        let mut counts: HashMap<Vec<usize>, usize> = HashMap::new();
        let trials = 60_000;

        for _ in 0..trials {
            *counts.entry(gen.generate(3)).or_default() += 1;
        }

        // 6 permutations, expected 10_000 each
        assert_eq!(counts.len(), 6);
        for (perm, count) in &counts {
            assert!(
                (9_000..=11_000).contains(count),
                "permutation {:?} appeared {} times",
                perm,
                count
            );
        }
    }
}
