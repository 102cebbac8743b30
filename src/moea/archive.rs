//! ε-box dominance archive.
//!
//! Objective space is partitioned into boxes of side `ε` per objective. The
//! archive keeps at most one solution per box and only boxes no other box
//! dominates, which bounds its size while keeping the front well spread.
//!
//! Reference: Deb, Mohan & Mishra (2005), "Evaluating the ε-domination based
//! multi-objective evolutionary algorithm for a quick computation of
//! Pareto-optimal solutions"

use super::multi_objective::{pareto_dominance, Dominance};
use super::types::Solution;

/// Archive of ε-box non-dominated solutions.
#[derive(Debug, Clone)]
pub struct EpsilonBoxArchive<G> {
    epsilons: Vec<f64>,
    members: Vec<Member<G>>,
}

#[derive(Debug, Clone)]
struct Member<G> {
    solution: Solution<G>,
    index: Vec<f64>,
}

impl<G: Clone> EpsilonBoxArchive<G> {
    /// Creates an empty archive.
    ///
    /// When fewer epsilons than objectives are given, the last value is
    /// repeated. Non-positive or missing values fall back to `0.01`.
    pub fn new(epsilons: &[f64]) -> Self {
        Self {
            epsilons: epsilons.to_vec(),
            members: Vec::new(),
        }
    }

    /// Box size used for objective `k`.
    pub fn epsilon(&self, k: usize) -> f64 {
        let eps = self
            .epsilons
            .get(k)
            .or(self.epsilons.last())
            .copied()
            .unwrap_or(0.01);
        if eps > 0.0 {
            eps
        } else {
            0.01
        }
    }

    fn box_index(&self, objectives: &[f64]) -> Vec<f64> {
        objectives
            .iter()
            .enumerate()
            .map(|(k, &v)| (v / self.epsilon(k)).floor())
            .collect()
    }

    /// Squared distance from the objectives to the lower corner of their box.
    fn corner_distance(&self, objectives: &[f64], index: &[f64]) -> f64 {
        objectives
            .iter()
            .zip(index)
            .enumerate()
            .map(|(k, (&v, &b))| {
                let d = v - b * self.epsilon(k);
                d * d
            })
            .sum()
    }

    /// Offers a solution to the archive.
    ///
    /// Returns `true` if the solution was stored. Members whose box is
    /// dominated by the newcomer's box are evicted. Within a shared box, the
    /// Pareto-dominating solution wins, otherwise the one closer to the box
    /// corner; the incumbent is kept on ties.
    pub fn add(&mut self, solution: Solution<G>) -> bool {
        let index = self.box_index(&solution.objectives);
        let mut evict = Vec::new();

        for (i, member) in self.members.iter().enumerate() {
            match pareto_dominance(&index, &member.index) {
                Dominance::Left => evict.push(i),
                Dominance::Right => return false,
                Dominance::Neither if index == member.index => {
                    match pareto_dominance(&solution.objectives, &member.solution.objectives) {
                        Dominance::Left => evict.push(i),
                        Dominance::Right => return false,
                        Dominance::Neither => {
                            let new = self.corner_distance(&solution.objectives, &index);
                            let old = self.corner_distance(&member.solution.objectives, &member.index);
                            if new < old {
                                evict.push(i);
                            } else {
                                return false;
                            }
                        }
                    }
                }
                Dominance::Neither => {}
            }
        }

        for &i in evict.iter().rev() {
            self.members.swap_remove(i);
        }
        self.members.push(Member { solution, index });
        true
    }

    /// Number of stored solutions.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the archive is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Stored solution at position `i`.
    pub fn get(&self, i: usize) -> Option<&Solution<G>> {
        self.members.get(i).map(|m| &m.solution)
    }

    /// Consumes the archive, returning its solutions.
    pub fn into_solutions(self) -> Vec<Solution<G>> {
        self.members.into_iter().map(|m| m.solution).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sol(tag: u32, objectives: &[f64]) -> Solution<u32> {
        Solution::new(tag, objectives.to_vec())
    }

    fn tags(archive: &EpsilonBoxArchive<u32>) -> Vec<u32> {
        let mut tags: Vec<u32> = archive.clone().into_solutions().iter().map(|s| s.genome).collect();
        tags.sort_unstable();
        tags
    }

    #[test]
    fn test_dominated_box_rejected() {
        let mut archive = EpsilonBoxArchive::new(&[1.0]);
        assert!(archive.add(sol(1, &[1.5, 1.5])));
        assert!(!archive.add(sol(2, &[3.2, 3.9])));
        assert_eq!(tags(&archive), vec![1]);
    }

    #[test]
    fn test_dominating_box_evicts() {
        let mut archive = EpsilonBoxArchive::new(&[1.0]);
        archive.add(sol(1, &[3.5, 0.5]));
        archive.add(sol(2, &[0.5, 3.5]));
        archive.add(sol(3, &[4.5, 4.5]));
        assert_eq!(tags(&archive), vec![1, 2]);

        assert!(archive.add(sol(4, &[0.2, 0.2])));
        assert_eq!(tags(&archive), vec![4]);
    }

    #[test]
    fn test_same_box_keeps_closer_to_corner() {
        let mut archive = EpsilonBoxArchive::new(&[1.0, 1.0]);
        archive.add(sol(1, &[2.1, 2.9]));
        // same box (2, 2), non-dominated, closer to (2, 2)
        assert!(archive.add(sol(2, &[2.8, 2.2])));
        assert_eq!(tags(&archive), vec![2]);
        // same box, farther away
        assert!(!archive.add(sol(3, &[2.05, 2.95])));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_same_box_dominance_wins() {
        let mut archive = EpsilonBoxArchive::new(&[10.0]);
        archive.add(sol(1, &[1.0, 9.0]));
        assert!(archive.add(sol(2, &[0.5, 8.0])));
        assert_eq!(tags(&archive), vec![2]);
    }

    #[test]
    fn test_epsilon_repeats_last_value() {
        let archive: EpsilonBoxArchive<u32> = EpsilonBoxArchive::new(&[0.5, 2.0]);
        assert!((archive.epsilon(0) - 0.5).abs() < 1e-12);
        assert!((archive.epsilon(2) - 2.0).abs() < 1e-12);
        let fallback: EpsilonBoxArchive<u32> = EpsilonBoxArchive::new(&[]);
        assert!((fallback.epsilon(1) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_archive_stays_mutually_nondominated() {
        let mut archive = EpsilonBoxArchive::new(&[0.5]);
        for i in 0..50u32 {
            let x = (i as f64 * 0.37) % 5.0;
            archive.add(sol(i, &[x, 5.0 - x + (i % 3) as f64]));
        }
        let members = archive.into_solutions();
        for a in &members {
            for b in &members {
                assert_ne!(pareto_dominance(&a.objectives, &b.objectives), Dominance::Left);
            }
        }
    }
}
