//! Permutation variation operators.
//!
//! Every operator maps valid permutations of `0..n` to valid permutations of
//! `0..n`, so a permutation genome never needs repair.
//!
//! # Crossover
//!
//! - [`Crossover::Order`] (OX): Davis (1985), keeps relative order
//! - [`Crossover::PartiallyMapped`] (PMX): Goldberg & Lingle (1985), keeps
//!   absolute positions
//!
//! # Mutation
//!
//! - [`Mutation::Swap`]: exchange two positions
//! - [`Mutation::Insert`]: move one element
//! - [`Mutation::Invert`]: reverse a segment (2-opt)

use crate::error::ConfigError;
use rand::Rng;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Permutation crossover operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Crossover {
    /// Order crossover (OX).
    #[default]
    Order,

    /// Partially mapped crossover (PMX).
    PartiallyMapped,
}

impl Crossover {
    /// Produces two children from two parent permutations.
    ///
    /// # Panics
    /// Panics if the parents differ in length.
    pub fn apply<R: Rng>(self, parent1: &[usize], parent2: &[usize], rng: &mut R) -> (Vec<usize>, Vec<usize>) {
        let n = parent1.len();
        assert_eq!(n, parent2.len(), "parents must have equal length");
        if n < 2 {
            return (parent1.to_vec(), parent2.to_vec());
        }

        let (start, end) = random_segment(n, rng);
        match self {
            Crossover::Order => (
                order_child(parent1, parent2, start, end),
                order_child(parent2, parent1, start, end),
            ),
            Crossover::PartiallyMapped => (
                pmx_child(parent1, parent2, start, end),
                pmx_child(parent2, parent1, start, end),
            ),
        }
    }
}

impl FromStr for Crossover {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ox" | "order" => Ok(Crossover::Order),
            "pmx" | "partially-mapped" => Ok(Crossover::PartiallyMapped),
            _ => Err(ConfigError::UnknownOperator {
                kind: "crossover",
                name: s.to_string(),
            }),
        }
    }
}

/// Permutation mutation operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mutation {
    /// Exchange two random positions.
    #[default]
    Swap,

    /// Remove an element and reinsert it elsewhere.
    Insert,

    /// Reverse a random segment.
    Invert,
}

impl Mutation {
    /// Mutates a permutation in place.
    pub fn apply<R: Rng>(self, perm: &mut Vec<usize>, rng: &mut R) {
        let n = perm.len();
        if n < 2 {
            return;
        }
        match self {
            Mutation::Swap => {
                let i = rng.random_range(0..n);
                let j = rng.random_range(0..n);
                perm.swap(i, j);
            }
            Mutation::Insert => {
                let item = perm.remove(rng.random_range(0..n));
                perm.insert(rng.random_range(0..n), item);
            }
            Mutation::Invert => {
                let (start, end) = random_segment(n, rng);
                perm[start..=end].reverse();
            }
        }
    }
}

impl FromStr for Mutation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "swap" => Ok(Mutation::Swap),
            "insert" | "insertion" => Ok(Mutation::Insert),
            "invert" | "inversion" => Ok(Mutation::Invert),
            _ => Err(ConfigError::UnknownOperator {
                kind: "mutation",
                name: s.to_string(),
            }),
        }
    }
}

/// OX child: segment from `template`, remaining genes in `donor` order,
/// starting after the segment and wrapping around.
fn order_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut taken = vec![false; n];

    for i in start..=end {
        child[i] = template[i];
        taken[template[i]] = true;
    }

    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let gene = donor[(end + 1 + offset) % n];
        if !taken[gene] {
            child[pos] = gene;
            pos = (pos + 1) % n;
        }
    }

    child
}

/// PMX child: segment from `template`; displaced `donor` genes follow the
/// segment mapping to a free slot; everything else is copied from `donor`.
fn pmx_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut placed = vec![false; n];
    let mut donor_pos = vec![0usize; n];
    for (pos, &gene) in donor.iter().enumerate() {
        donor_pos[gene] = pos;
    }

    for i in start..=end {
        child[i] = template[i];
        placed[template[i]] = true;
    }

    for i in start..=end {
        let gene = donor[i];
        if placed[gene] {
            continue;
        }
        let mut pos = i;
        while (start..=end).contains(&pos) {
            pos = donor_pos[template[pos]];
        }
        child[pos] = gene;
        placed[gene] = true;
    }

    for (slot, &gene) in child.iter_mut().zip(donor) {
        if *slot == usize::MAX {
            *slot = gene;
        }
    }

    child
}

/// Random segment `[start, end]` within `0..n`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    (a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn is_valid_permutation(perm: &[usize], n: usize) -> bool {
        let set: HashSet<usize> = perm.iter().copied().collect();
        perm.len() == n && set.len() == n && perm.iter().all(|&v| v < n)
    }

    #[test]
    fn test_crossovers_produce_valid_permutations() {
        let mut rng = StdRng::seed_from_u64(42);
        let p1: Vec<usize> = (0..8).collect();
        let p2 = vec![3, 7, 5, 1, 6, 0, 2, 4];

        for op in [Crossover::Order, Crossover::PartiallyMapped] {
            for _ in 0..200 {
                let (c1, c2) = op.apply(&p1, &p2, &mut rng);
                assert!(is_valid_permutation(&c1, 8), "{op:?} child1 invalid: {c1:?}");
                assert!(is_valid_permutation(&c2, 8), "{op:?} child2 invalid: {c2:?}");
            }
        }
    }

    #[test]
    fn test_ox_keeps_segment() {
        let child = order_child(&[0, 1, 2, 3, 4], &[4, 3, 2, 1, 0], 1, 2);
        assert_eq!(&child[1..=2], &[1, 2]);
        // donor order after the segment: 1 (taken), 0, 4, 3
        assert_eq!(child, vec![3, 1, 2, 0, 4]);
    }

    #[test]
    fn test_pmx_follows_mapping() {
        // Classic textbook example, shifted to 0-based genes
        let shift = |genes: &[usize]| genes.iter().map(|g| g - 1).collect::<Vec<usize>>();
        let template = shift(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let donor = shift(&[9, 3, 7, 8, 2, 6, 5, 1, 4]);

        let child = pmx_child(&template, &donor, 3, 6);
        assert_eq!(child, shift(&[9, 3, 2, 4, 5, 6, 7, 1, 8]));
    }

    #[test]
    fn test_identical_parents() {
        let mut rng = StdRng::seed_from_u64(5);
        let p = vec![2, 0, 4, 1, 3];
        for op in [Crossover::Order, Crossover::PartiallyMapped] {
            let (c1, c2) = op.apply(&p, &p, &mut rng);
            assert_eq!(c1, p);
            assert_eq!(c2, p);
        }
    }

    #[test]
    fn test_single_element() {
        let mut rng = StdRng::seed_from_u64(1);
        let (c1, c2) = Crossover::Order.apply(&[0], &[0], &mut rng);
        assert_eq!(c1, vec![0]);
        assert_eq!(c2, vec![0]);

        let mut perm = vec![0];
        for op in [Mutation::Swap, Mutation::Insert, Mutation::Invert] {
            op.apply(&mut perm, &mut rng);
            assert_eq!(perm, vec![0]);
        }
    }

    #[test]
    fn test_mutations_preserve_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        for op in [Mutation::Swap, Mutation::Insert, Mutation::Invert] {
            for _ in 0..100 {
                let mut perm: Vec<usize> = (0..10).collect();
                op.apply(&mut perm, &mut rng);
                assert!(is_valid_permutation(&perm, 10), "{op:?} broke {perm:?}");
            }
        }
    }

    #[test]
    fn test_operator_names() {
        assert_eq!("OX".parse::<Crossover>().unwrap(), Crossover::Order);
        assert_eq!("pmx".parse::<Crossover>().unwrap(), Crossover::PartiallyMapped);
        assert_eq!("swap".parse::<Mutation>().unwrap(), Mutation::Swap);
        assert_eq!("Insertion".parse::<Mutation>().unwrap(), Mutation::Insert);
        assert_eq!("invert".parse::<Mutation>().unwrap(), Mutation::Invert);
        assert!("sbx".parse::<Crossover>().is_err());
        assert!("gauss".parse::<Mutation>().is_err());
    }

    #[test]
    fn test_random_segment_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let (start, end) = random_segment(10, &mut rng);
            assert!(start <= end && end < 10);
        }
    }
}
