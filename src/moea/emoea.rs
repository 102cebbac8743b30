//! ε-MOEA.
//!
//! Steady-state: each offspring is bred from one population member (binary
//! dominance tournament) and one random archive member. The offspring then
//! competes for a population slot and for a place in the ε-box archive. The
//! archive is the result.
//!
//! Offspring are bred in batches of [`SearchConfig::offspring_batch`] so that
//! evaluation can run in parallel; insertion stays sequential in breeding
//! order.
//!
//! # Reference
//!
//! Deb, Mohan & Mishra (2003), "A Fast Multi-objective Evolutionary
//! Algorithm for Finding Well-Spread Pareto-Optimal Solutions"

use super::archive::EpsilonBoxArchive;
use super::config::SearchConfig;
use super::multi_objective::{pareto_dominance, Dominance};
use super::runner::{evaluate_all, vary, Budget};
use super::selection::dominance_tournament;
use super::types::{MoProblem, Solution};
use rand::rngs::StdRng;
use rand::Rng;

pub(crate) fn run<P: MoProblem>(
    problem: &P,
    config: &SearchConfig,
    epsilons: &[f64],
    rng: &mut StdRng,
    budget: &mut Budget,
) -> (Vec<Solution<P::Genome>>, usize) {
    let genomes = problem.initial_population(config.population_size.min(budget.remaining()), rng);
    let mut population = evaluate_all(problem, genomes, config.parallel, budget);

    let mut archive = EpsilonBoxArchive::new(epsilons);
    for solution in &population {
        archive.add(solution.clone());
    }

    let mut generations = 0;
    while !population.is_empty() && !budget.exhausted() {
        let batch = config.offspring_batch.min(budget.remaining());
        let mut children = Vec::with_capacity(batch);
        {
            let objectives: Vec<&[f64]> = population.iter().map(|s| s.objectives.as_slice()).collect();
            while children.len() < batch {
                let a = dominance_tournament(&objectives, rng);
                let partner = if archive.is_empty() {
                    &population[rng.random_range(0..population.len())].genome
                } else {
                    archive
                        .get(rng.random_range(0..archive.len()))
                        .map_or(&population[a].genome, |s| &s.genome)
                };
                for child in vary(problem, &population[a].genome, partner, config, rng) {
                    if children.len() < batch {
                        children.push(child);
                    }
                }
            }
        }

        for child in evaluate_all(problem, children, config.parallel, budget) {
            replace_in_population(&mut population, &child, rng);
            archive.add(child);
        }
        generations += 1;

        log::trace!("eMOEA batch {}: archive holds {}", generations, archive.len());
    }

    (archive.into_solutions(), generations)
}

/// Steady-state population update.
///
/// The child replaces a random member it dominates; if it dominates none
/// and none dominates it, it replaces a random member; if any member
/// dominates it, it is discarded.
fn replace_in_population<G: Clone, R: Rng>(population: &mut [Solution<G>], child: &Solution<G>, rng: &mut R) {
    let mut dominated = Vec::new();
    for (i, member) in population.iter().enumerate() {
        match pareto_dominance(&child.objectives, &member.objectives) {
            Dominance::Left => dominated.push(i),
            Dominance::Right => return,
            Dominance::Neither => {}
        }
    }

    let slot = if dominated.is_empty() {
        rng.random_range(0..population.len())
    } else {
        dominated[rng.random_range(0..dominated.len())]
    };
    population[slot] = child.clone();
}
