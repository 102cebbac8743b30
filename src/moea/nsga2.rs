//! NSGA-II.
//!
//! Generational loop: parents are drawn from the ranked population,
//! `population_size` offspring are evaluated, and the merged
//! parent + offspring pool is truncated back by non-dominated rank and
//! crowding distance.
//!
//! # Reference
//!
//! Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm:
//! NSGA-II"

use super::config::SearchConfig;
use super::multi_objective::{select_and_rank, RankedIndex};
use super::runner::{evaluate_all, vary, Budget};
use super::selection::{tournament, ShuffledPool};
use super::types::{MoProblem, Solution};
use rand::rngs::StdRng;
use std::cmp::Ordering;

pub(crate) fn run<P: MoProblem>(
    problem: &P,
    config: &SearchConfig,
    with_replacement: bool,
    rng: &mut StdRng,
    budget: &mut Budget,
) -> (Vec<Solution<P::Genome>>, usize) {
    let n = config.population_size;
    let genomes = problem.initial_population(n.min(budget.remaining()), rng);
    let initial = evaluate_all(problem, genomes, config.parallel, budget);
    let (mut population, mut ranks) = truncate(initial, n);

    let mut pairing = ShuffledPool::new(population.len());
    let mut generations = 0;

    while !population.is_empty() && !budget.exhausted() {
        let target = n.min(budget.remaining());
        let mut offspring = Vec::with_capacity(target);

        while offspring.len() < target {
            let (a, b) = if with_replacement {
                let better = |x: usize, y: usize| ranks[x].crowded_cmp(&ranks[y]) == Ordering::Less;
                (
                    tournament(population.len(), 2, rng, better),
                    tournament(population.len(), 2, rng, better),
                )
            } else {
                (pairing.next(rng), pairing.next(rng))
            };

            for child in vary(problem, &population[a].genome, &population[b].genome, config, rng) {
                if offspring.len() < target {
                    offspring.push(child);
                }
            }
        }

        let evaluated = evaluate_all(problem, offspring, config.parallel, budget);
        population.extend(evaluated);
        (population, ranks) = truncate(population, n);
        generations += 1;

        log::trace!(
            "NSGA-II generation {}: {} in first front",
            generations,
            ranks.iter().filter(|r| r.rank == 0).count()
        );
    }

    let front = population
        .into_iter()
        .zip(ranks)
        .filter(|(_, r)| r.rank == 0)
        .map(|(solution, _)| solution)
        .collect();
    (front, generations)
}

/// Keeps the best `n` solutions, reordered so that `ranks[i]` describes
/// `population[i]`.
fn truncate<G>(solutions: Vec<Solution<G>>, n: usize) -> (Vec<Solution<G>>, Vec<RankedIndex>) {
    let objectives: Vec<Vec<f64>> = solutions.iter().map(|s| s.objectives.clone()).collect();
    let selected = select_and_rank(&objectives, n);

    let mut slots: Vec<Option<Solution<G>>> = solutions.into_iter().map(Some).collect();
    let mut population = Vec::with_capacity(selected.len());
    let mut ranks = Vec::with_capacity(selected.len());
    for ranked in selected {
        if let Some(solution) = slots[ranked.index].take() {
            ranks.push(RankedIndex {
                index: population.len(),
                ..ranked
            });
            population.push(solution);
        }
    }
    (population, ranks)
}
