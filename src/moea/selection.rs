//! Parent selection.
//!
//! All selectors return an index into the population they were given.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::multi_objective::{pareto_dominance, Dominance};
use rand::seq::SliceRandom;
use rand::Rng;

/// Tournament selection with a custom "is better" predicate.
///
/// Samples `size` indices with replacement from `0..n` and keeps the best.
///
/// # Panics
/// Panics if `n == 0`.
pub fn tournament<R, F>(n: usize, size: usize, rng: &mut R, mut better: F) -> usize
where
    R: Rng,
    F: FnMut(usize, usize) -> bool,
{
    assert!(n > 0, "cannot select from empty population");

    let mut best = rng.random_range(0..n);
    for _ in 1..size.max(1) {
        let challenger = rng.random_range(0..n);
        if better(challenger, best) {
            best = challenger;
        }
    }
    best
}

/// Binary tournament under strict Pareto dominance.
///
/// When neither contestant dominates, one of them is picked at random.
pub fn dominance_tournament<R: Rng>(objectives: &[&[f64]], rng: &mut R) -> usize {
    assert!(!objectives.is_empty(), "cannot select from empty population");

    let a = rng.random_range(0..objectives.len());
    let b = rng.random_range(0..objectives.len());
    match pareto_dominance(objectives[a], objectives[b]) {
        Dominance::Left => a,
        Dominance::Right => b,
        Dominance::Neither => {
            if rng.random_bool(0.5) {
                a
            } else {
                b
            }
        }
    }
}

/// Draws indices without replacement, reshuffling once every index was used.
#[derive(Debug, Clone)]
pub struct ShuffledPool {
    order: Vec<usize>,
    cursor: usize,
}

impl ShuffledPool {
    /// Creates a pool over `0..n`.
    pub fn new(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
            cursor: n,
        }
    }

    /// Next index.
    ///
    /// # Panics
    /// Panics if the pool was created empty.
    pub fn next<R: Rng>(&mut self, rng: &mut R) -> usize {
        assert!(!self.order.is_empty(), "cannot select from empty population");
        if self.cursor >= self.order.len() {
            self.order.shuffle(rng);
            self.cursor = 0;
        }
        let index = self.order[self.cursor];
        self.cursor += 1;
        index
    }
}
