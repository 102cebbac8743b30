//! MOEA/D with Tchebycheff decomposition.
//!
//! The population holds one solution per weight vector. For each subproblem
//! an offspring is bred from its neighbourhood (probability `delta`) or from
//! the whole population, and may replace at most `eta` slots whose weighted
//! Tchebycheff value it improves.
//!
//! One generation breeds an offspring per active subproblem, evaluates all of
//! them behind a single barrier, then applies the replacements in subproblem
//! order.
//!
//! With `update_utility` set, subproblems are picked by utility
//! (dynamic resource allocation) instead of visiting all of them.
//!
//! # References
//!
//! - Zhang & Li (2007), "MOEA/D: A Multiobjective Evolutionary Algorithm
//!   Based on Decomposition"
//! - Zhang, Liu & Li (2009), "The Performance of a New Version of MOEA/D
//!   on CEC09 Unconstrained MOP Test Instances"

use super::config::SearchConfig;
use super::multi_objective::nondominated_indices;
use super::runner::{evaluate_all, vary, Budget};
use super::selection::tournament;
use super::types::{MoProblem, Solution};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Weights below this are raised to it inside the Tchebycheff function.
const MIN_WEIGHT: f64 = 1e-4;

/// Relative improvement above which a subproblem's utility resets to 1.
const UTILITY_THRESHOLD: f64 = 0.001;

/// Candidate weight vectors sampled per population slot.
const WEIGHT_SAMPLES: usize = 50;

/// Tournament size for utility-based subproblem selection.
const UTILITY_TOURNAMENT: usize = 10;

pub(crate) struct Params {
    pub(crate) neighborhood_size: usize,
    pub(crate) delta: f64,
    pub(crate) eta: usize,
    pub(crate) update_utility: Option<usize>,
}

pub(crate) fn run<P: MoProblem>(
    problem: &P,
    config: &SearchConfig,
    params: &Params,
    rng: &mut StdRng,
    budget: &mut Budget,
) -> (Vec<Solution<P::Genome>>, usize) {
    let m = problem.objective_count().max(1);
    let n = config.population_size.max(m).min(budget.remaining().max(1));

    let weights = weight_vectors(n, m, rng);
    let neighbors = neighborhoods(&weights, params.neighborhood_size.min(n));

    let genomes = problem.initial_population(n, rng);
    let mut population = evaluate_all(problem, genomes, config.parallel, budget);
    let n = population.len();

    let mut ideal = vec![f64::INFINITY; m];
    for solution in &population {
        update_ideal(&mut ideal, &solution.objectives);
    }

    let mut utility = vec![1.0; n];
    let mut previous: Vec<f64> = (0..n)
        .map(|i| tchebycheff(&population[i].objectives, &weights[i], &ideal))
        .collect();

    let mut generations = 0;
    while n > 0 && !budget.exhausted() {
        let mut order = match params.update_utility {
            Some(_) => select_by_utility(&utility, m, rng),
            None => (0..n).collect(),
        };
        order.shuffle(rng);
        order.truncate(budget.remaining());

        let mut plan = Vec::with_capacity(order.len());
        let mut children = Vec::with_capacity(order.len());
        for &i in &order {
            let local = rng.random_range(0.0..1.0) < params.delta;
            let (a, b) = if local {
                let hood = &neighbors[i];
                (hood[rng.random_range(0..hood.len())], hood[rng.random_range(0..hood.len())])
            } else {
                (rng.random_range(0..n), rng.random_range(0..n))
            };
            let offspring = vary(problem, &population[a].genome, &population[b].genome, config, rng);
            if let Some(child) = offspring.into_iter().next() {
                plan.push((i, local));
                children.push(child);
            }
        }

        let evaluated = evaluate_all(problem, children, config.parallel, budget);
        for ((i, local), child) in plan.into_iter().zip(evaluated) {
            update_ideal(&mut ideal, &child.objectives);

            let mut candidates = if local { neighbors[i].clone() } else { (0..n).collect() };
            candidates.shuffle(rng);

            let mut replaced = 0;
            for j in candidates {
                if replaced >= params.eta {
                    break;
                }
                let incumbent = tchebycheff(&population[j].objectives, &weights[j], &ideal);
                if tchebycheff(&child.objectives, &weights[j], &ideal) < incumbent {
                    population[j] = child.clone();
                    replaced += 1;
                }
            }
        }
        generations += 1;

        if let Some(period) = params.update_utility {
            if generations % period == 0 {
                for i in 0..n {
                    let current = tchebycheff(&population[i].objectives, &weights[i], &ideal);
                    utility[i] = next_utility(utility[i], previous[i], current);
                    previous[i] = current;
                }
            }
        }

        log::trace!("MOEA/D generation {}: ideal point {:?}", generations, ideal);
    }

    let objectives: Vec<Vec<f64>> = population.iter().map(|s| s.objectives.clone()).collect();
    let keep = nondominated_indices(&objectives);
    let mut slots: Vec<Option<Solution<P::Genome>>> = population.into_iter().map(Some).collect();
    let front = keep.into_iter().filter_map(|i| slots[i].take()).collect();
    (front, generations)
}

/// Weighted Tchebycheff distance to the ideal point.
fn tchebycheff(objectives: &[f64], weights: &[f64], ideal: &[f64]) -> f64 {
    objectives
        .iter()
        .zip(weights)
        .zip(ideal)
        .map(|((&f, &w), &z)| w.max(MIN_WEIGHT) * (f - z).abs())
        .fold(f64::NEG_INFINITY, f64::max)
}

fn update_ideal(ideal: &mut [f64], objectives: &[f64]) {
    for (z, &f) in ideal.iter_mut().zip(objectives) {
        if f < *z {
            *z = f;
        }
    }
}

fn next_utility(utility: f64, previous: f64, current: f64) -> f64 {
    let improvement = if previous > 0.0 {
        ((previous - current) / previous).max(0.0)
    } else {
        0.0
    };
    if improvement > UTILITY_THRESHOLD {
        1.0
    } else {
        (0.95 + 0.05 * improvement / UTILITY_THRESHOLD) * utility
    }
}

/// Boundary subproblems plus utility tournaments, `n / 5` in total.
fn select_by_utility<R: Rng>(utility: &[f64], m: usize, rng: &mut R) -> Vec<usize> {
    let n = utility.len();
    let mut selected: Vec<usize> = (0..m.min(n)).collect();
    let extra = (n / 5).saturating_sub(selected.len());
    for _ in 0..extra {
        selected.push(tournament(n, UTILITY_TOURNAMENT, rng, |a, b| utility[a] > utility[b]));
    }
    selected
}

/// `n` weight vectors on the unit simplex: the `m` axis vectors first, then
/// a greedy max-min spread picked from random samples.
fn weight_vectors<R: Rng>(n: usize, m: usize, rng: &mut R) -> Vec<Vec<f64>> {
    let mut weights: Vec<Vec<f64>> = (0..m.min(n))
        .map(|k| (0..m).map(|j| if j == k { 1.0 } else { 0.0 }).collect())
        .collect();
    if weights.len() >= n {
        return weights;
    }

    let candidates: Vec<Vec<f64>> = (0..n * WEIGHT_SAMPLES).map(|_| simplex_point(m, rng)).collect();
    let mut nearest: Vec<f64> = candidates
        .iter()
        .map(|c| weights.iter().map(|w| distance(c, w)).fold(f64::INFINITY, f64::min))
        .collect();

    while weights.len() < n {
        let Some((best, _)) = nearest
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
        else {
            break;
        };
        if nearest[best] < 0.0 {
            break;
        }
        let chosen = candidates[best].clone();
        for (c, d) in candidates.iter().zip(nearest.iter_mut()) {
            *d = d.min(distance(c, &chosen));
        }
        nearest[best] = -1.0;
        weights.push(chosen);
    }
    weights
}

/// Uniform sample from the unit simplex.
fn simplex_point<R: Rng>(m: usize, rng: &mut R) -> Vec<f64> {
    let raw: Vec<f64> = (0..m).map(|_| -(1.0 - rng.random::<f64>()).ln()).collect();
    let sum: f64 = raw.iter().sum();
    if sum > 0.0 {
        raw.into_iter().map(|x| x / sum).collect()
    } else {
        vec![1.0 / m as f64; m]
    }
}

/// For each weight vector, the indices of the `t` closest ones (itself
/// included).
fn neighborhoods(weights: &[Vec<f64>], t: usize) -> Vec<Vec<usize>> {
    weights
        .iter()
        .map(|w| {
            let mut order: Vec<usize> = (0..weights.len()).collect();
            order.sort_by(|&a, &b| distance(w, &weights[a]).total_cmp(&distance(w, &weights[b])));
            order.truncate(t.max(1));
            order
        })
        .collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}
