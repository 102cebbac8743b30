//! Weighted single-objective GA.
//!
//! Objectives are folded into one scalar with [`Aggregation`]; a
//! generational GA with binary tournaments and one elite minimizes it. The
//! result is the single best solution seen.

use super::config::SearchConfig;
use super::runner::{evaluate_all, vary, Budget};
use super::selection::tournament;
use super::types::{MoProblem, Solution};
use crate::error::ConfigError;
use rand::rngs::StdRng;
use std::cmp::Ordering;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How objectives are combined into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Aggregation {
    /// Weighted sum.
    #[default]
    Linear,
    /// Weighted maximum.
    MinMax,
}

impl Aggregation {
    /// Aggregates `objectives`; weights shorter than the objective vector
    /// repeat their last value, an empty weight list means all ones.
    ///
    /// ```
    /// use u_vrptw::moea::Aggregation;
    ///
    /// assert_eq!(Aggregation::Linear.aggregate(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
    /// assert_eq!(Aggregation::MinMax.aggregate(&[1.0], &[3.0, 4.0]), 4.0);
    /// ```
    pub fn aggregate(self, weights: &[f64], objectives: &[f64]) -> f64 {
        let weighted = objectives.iter().enumerate().map(|(k, &f)| {
            let w = weights.get(k).or(weights.last()).copied().unwrap_or(1.0);
            w * f
        });
        match self {
            Aggregation::Linear => weighted.sum(),
            Aggregation::MinMax => weighted.fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

impl FromStr for Aggregation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Aggregation::Linear),
            "min-max" | "minmax" => Ok(Aggregation::MinMax),
            _ => Err(ConfigError::UnknownWeightingMethod(s.to_string())),
        }
    }
}

struct Scored<G> {
    solution: Solution<G>,
    fitness: f64,
}

pub(crate) fn run<P: MoProblem>(
    problem: &P,
    config: &SearchConfig,
    weights: &[f64],
    aggregation: Aggregation,
    rng: &mut StdRng,
    budget: &mut Budget,
) -> (Vec<Solution<P::Genome>>, usize) {
    let score = |solutions: Vec<Solution<P::Genome>>| -> Vec<Scored<P::Genome>> {
        solutions
            .into_iter()
            .map(|solution| {
                let fitness = aggregation.aggregate(weights, &solution.objectives);
                Scored { solution, fitness }
            })
            .collect()
    };

    let n = config.population_size;
    let genomes = problem.initial_population(n.min(budget.remaining()), rng);
    let mut population = score(evaluate_all(problem, genomes, config.parallel, budget));
    sort_by_fitness(&mut population);

    let mut generations = 0;
    while !population.is_empty() && !budget.exhausted() {
        let births = (n - 1).min(budget.remaining()).max(1);
        let mut offspring = Vec::with_capacity(births);
        while offspring.len() < births {
            let better = |a: usize, b: usize| population[a].fitness < population[b].fitness;
            let a = tournament(population.len(), 2, rng, better);
            let b = tournament(population.len(), 2, rng, better);
            for child in vary(
                problem,
                &population[a].solution.genome,
                &population[b].solution.genome,
                config,
                rng,
            ) {
                if offspring.len() < births {
                    offspring.push(child);
                }
            }
        }

        let mut offspring = score(evaluate_all(problem, offspring, config.parallel, budget));
        // elite first, then the newborn, then the best survivors as filler
        let mut survivors = population.drain(..);
        let mut next: Vec<Scored<P::Genome>> = survivors.next().into_iter().collect();
        next.append(&mut offspring);
        next.extend(survivors.take(n.saturating_sub(next.len())));
        population = next;
        sort_by_fitness(&mut population);
        generations += 1;

        log::trace!(
            "GA generation {}: best fitness {}",
            generations,
            population.first().map_or(f64::NAN, |s| s.fitness)
        );
    }

    let best = population.into_iter().next().map(|s| s.solution);
    (best.into_iter().collect(), generations)
}

fn sort_by_fitness<G>(population: &mut [Scored<G>]) {
    population.sort_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap_or(Ordering::Equal));
}
