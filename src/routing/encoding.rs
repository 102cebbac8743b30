//! Bounded real-key chromosome encoding and distinct random initialization.
//!
//! A chromosome of `n` tasks can be carried as `n` real values in
//! `[0, n - KEY_EPSILON]`. Flooring each value yields the task index of that
//! gene. Real-valued variation can collapse two genes onto the same index;
//! such chromosomes are rejected as infeasible by the evaluator rather than
//! repaired here.
//!
//! The initial population is always built from distinct shuffles, so every
//! generation-zero individual decodes to a full permutation.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Gap between the largest admissible key and the task count.
pub const KEY_EPSILON: f64 = 0.001;

/// Upper bound of a key for a chromosome of `task_count` genes.
pub fn key_upper_bound(task_count: usize) -> f64 {
    (task_count as f64 - KEY_EPSILON).max(0.0)
}

/// Encodes a permutation as bounded real keys.
pub fn encode(permutation: &[usize]) -> Vec<f64> {
    permutation.iter().map(|&gene| gene as f64).collect()
}

/// Floors bounded real keys into task indices.
///
/// Keys are clamped to `[0, key_upper_bound(keys.len())]` first, so the
/// result only ever holds valid indices, possibly repeated.
pub fn decode_keys(keys: &[f64]) -> Vec<usize> {
    let upper = key_upper_bound(keys.len());
    keys.iter()
        .map(|&key| {
            let key = if key.is_nan() { 0.0 } else { key.clamp(0.0, upper) };
            key.floor() as usize
        })
        .collect()
}

/// Creates `population_size` random permutations of `0..task_count`,
/// encoded as bounded real keys.
///
/// Permutations are pairwise distinct while `task_count!` allows it; beyond
/// that, repeats are unavoidable and accepted.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_vrptw::routing::{decode_keys, initialize};
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let population = initialize(5, 10, &mut rng);
/// assert_eq!(population.len(), 10);
///
/// let mut genes = decode_keys(&population[0]);
/// genes.sort_unstable();
/// assert_eq!(genes, vec![0, 1, 2, 3, 4]);
/// ```
pub fn initialize<R: Rng>(task_count: usize, population_size: usize, rng: &mut R) -> Vec<Vec<f64>> {
    let distinct_limit = permutation_count(task_count, population_size);
    let mut seen: HashSet<Vec<usize>> = HashSet::with_capacity(population_size);
    let mut population = Vec::with_capacity(population_size);

    while population.len() < population_size {
        let mut permutation: Vec<usize> = (0..task_count).collect();
        permutation.shuffle(rng);

        if seen.len() < distinct_limit && !seen.insert(permutation.clone()) {
            continue;
        }
        population.push(encode(&permutation));
    }

    population
}

/// `n!`, saturated at `cap`.
fn permutation_count(n: usize, cap: usize) -> usize {
    let mut count = 1usize;
    for k in 2..=n {
        count = count.saturating_mul(k);
        if count >= cap {
            return cap;
        }
    }
    count.min(cap)
}
