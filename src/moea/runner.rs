//! Search execution.
//!
//! [`SearchRunner`] drives one of the [`Algorithm`] variants against a
//! [`MoProblem`]. Every algorithm shares the same skeleton:
//!
//! 1. initialize and evaluate the population
//! 2. produce offspring on the controlling thread
//! 3. evaluate the offspring (fanned out across the rayon pool)
//! 4. merge them into population / archive on the controlling thread
//! 5. repeat until the evaluation budget, the time limit, or cancellation
//!    stops the run
//!
//! Step 3 is a barrier: no selection or replacement happens until every
//! offspring of the batch has been evaluated.

use super::config::SearchConfig;
use super::scalar::Aggregation;
use super::types::{MoProblem, Solution};
use super::{emoea, moead, nsga2, scalar};
use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Search algorithm with fully resolved parameters.
///
/// All variants share the population loop; they differ in selection,
/// replacement, and archiving policy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    /// NSGA-II: generational, non-dominated sorting with crowding distance.
    NsgaII {
        /// Binary tournament on (rank, crowding) when `true`; shuffled
        /// pairing without replacement otherwise.
        with_replacement: bool,
    },

    /// ε-MOEA: steady-state population plus ε-box dominance archive.
    EpsilonMoea {
        /// Box size per objective; the last value repeats.
        epsilons: Vec<f64>,
    },

    /// MOEA/D: Tchebycheff decomposition into weighted subproblems.
    Decomposition {
        /// Number of closest weight vectors forming a neighbourhood.
        neighborhood_size: usize,
        /// Probability of mating inside the neighbourhood.
        delta: f64,
        /// Maximum number of population slots one offspring may replace.
        eta: usize,
        /// Utility update period in generations; `None` disables
        /// utility-based subproblem selection.
        update_utility: Option<usize>,
    },

    /// Single-objective GA over an aggregate of the objectives.
    WeightedScalar {
        /// Objective weights; the last value repeats.
        weights: Vec<f64>,
        /// Aggregation method.
        aggregation: Aggregation,
    },
}

impl Algorithm {
    /// Short algorithm name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::NsgaII { .. } => "NSGA-II",
            Algorithm::EpsilonMoea { .. } => "eMOEA",
            Algorithm::Decomposition { .. } => "MOEA/D",
            Algorithm::WeightedScalar { .. } => "GeneticAlgorithm",
        }
    }

    /// Validates the algorithm parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Algorithm::NsgaII { .. } => Ok(()),
            Algorithm::EpsilonMoea { epsilons } => {
                if epsilons.iter().any(|&e| !(e > 0.0)) {
                    return Err(ConfigError::OutOfRange("epsilon values must be positive"));
                }
                Ok(())
            }
            Algorithm::Decomposition {
                neighborhood_size,
                delta,
                eta,
                update_utility,
            } => {
                if *neighborhood_size == 0 {
                    return Err(ConfigError::OutOfRange("neighborhood_size must be at least 1"));
                }
                if !(0.0..=1.0).contains(delta) {
                    return Err(ConfigError::OutOfRange("delta must lie in [0, 1]"));
                }
                if *eta == 0 {
                    return Err(ConfigError::OutOfRange("eta must be at least 1"));
                }
                if *update_utility == Some(0) {
                    return Err(ConfigError::OutOfRange("update_utility must be positive or None"));
                }
                Ok(())
            }
            Algorithm::WeightedScalar { weights, .. } => {
                if weights.iter().any(|w| !w.is_finite()) {
                    return Err(ConfigError::OutOfRange("weights must be finite"));
                }
                Ok(())
            }
        }
    }
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchResult<G> {
    /// Non-dominated solutions found (a single best solution for
    /// [`Algorithm::WeightedScalar`]).
    pub front: Vec<Solution<G>>,

    /// Number of evaluations performed.
    pub evaluations: usize,

    /// Number of completed generations (offspring batches).
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

/// Executes a search.
///
/// # Usage
///
/// ```ignore
/// let algorithm = Algorithm::NsgaII { with_replacement: true };
/// let config = SearchConfig::default().with_seed(42);
/// let result = SearchRunner::run(&problem, &algorithm, &config)?;
/// println!("front size: {}", result.front.len());
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Runs the search.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the configuration or the algorithm
    /// parameters are invalid.
    pub fn run<P: MoProblem>(
        problem: &P,
        algorithm: &Algorithm,
        config: &SearchConfig,
    ) -> Result<SearchResult<P::Genome>, ConfigError> {
        Self::run_with_cancel(problem, algorithm, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is checked between generations; the run then returns the
    /// front found so far.
    pub fn run_with_cancel<P: MoProblem>(
        problem: &P,
        algorithm: &Algorithm,
        config: &SearchConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult<P::Genome>, ConfigError> {
        config.validate()?;
        algorithm.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let mut budget = Budget::new(config, cancel);

        let (front, generations) = match algorithm {
            Algorithm::NsgaII { with_replacement } => {
                nsga2::run(problem, config, *with_replacement, &mut rng, &mut budget)
            }
            Algorithm::EpsilonMoea { epsilons } => {
                emoea::run(problem, config, epsilons, &mut rng, &mut budget)
            }
            Algorithm::Decomposition {
                neighborhood_size,
                delta,
                eta,
                update_utility,
            } => {
                let params = moead::Params {
                    neighborhood_size: *neighborhood_size,
                    delta: *delta,
                    eta: *eta,
                    update_utility: *update_utility,
                };
                moead::run(problem, config, &params, &mut rng, &mut budget)
            }
            Algorithm::WeightedScalar {
                weights,
                aggregation,
            } => scalar::run(problem, config, weights, *aggregation, &mut rng, &mut budget),
        };

        log::debug!(
            "{} finished: {} evaluations, {} generations, front of {}",
            algorithm.name(),
            budget.evaluations,
            generations,
            front.len()
        );

        Ok(SearchResult {
            front,
            evaluations: budget.evaluations,
            generations,
            cancelled: budget.cancelled,
        })
    }
}

/// Termination bookkeeping shared by every algorithm.
pub(crate) struct Budget {
    max_evaluations: usize,
    pub(crate) evaluations: usize,
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
    pub(crate) cancelled: bool,
}

impl Budget {
    fn new(config: &SearchConfig, cancel: Option<Arc<AtomicBool>>) -> Self {
        Self {
            max_evaluations: config.max_evaluations,
            evaluations: 0,
            deadline: config
                .time_limit_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            cancel,
            cancelled: false,
        }
    }

    /// Evaluations left before the budget runs out.
    pub(crate) fn remaining(&self) -> usize {
        self.max_evaluations.saturating_sub(self.evaluations)
    }

    /// Whether the run must stop before the next generation.
    pub(crate) fn exhausted(&mut self) -> bool {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                self.cancelled = true;
                return true;
            }
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return true;
        }
        self.remaining() == 0
    }
}

/// Evaluates a batch of genomes, in parallel when enabled.
pub(crate) fn evaluate_all<P: MoProblem>(
    problem: &P,
    genomes: Vec<P::Genome>,
    parallel: bool,
    budget: &mut Budget,
) -> Vec<Solution<P::Genome>> {
    budget.evaluations += genomes.len();

    #[cfg(feature = "parallel")]
    {
        if parallel {
            return genomes
                .into_par_iter()
                .map(|genome| {
                    let objectives = problem.evaluate(&genome);
                    Solution::new(genome, objectives)
                })
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    genomes
        .into_iter()
        .map(|genome| {
            let objectives = problem.evaluate(&genome);
            Solution::new(genome, objectives)
        })
        .collect()
}

/// Applies crossover and mutation with the configured rates.
pub(crate) fn vary<P: MoProblem, R: Rng>(
    problem: &P,
    parent1: &P::Genome,
    parent2: &P::Genome,
    config: &SearchConfig,
    rng: &mut R,
) -> Vec<P::Genome> {
    let mut children = if rng.random_range(0.0..1.0) < config.crossover_rate {
        problem.crossover(parent1, parent2, rng)
    } else {
        vec![parent1.clone()]
    };

    for child in &mut children {
        if rng.random_range(0.0..1.0) < config.mutation_rate {
            problem.mutate(child, rng);
        }
    }

    children
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::moea::multi_objective::{pareto_dominance, Dominance};
    use crate::moea::operators::{Crossover, Mutation};

    /// Bi-objective permutation problem: position-weighted displacement
    /// toward the identity and toward the reversed identity.
    pub(crate) struct TwoTargets {
        pub(crate) n: usize,
    }

    impl MoProblem for TwoTargets {
        type Genome = Vec<usize>;

        fn objective_count(&self) -> usize {
            2
        }

        fn create_genome<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
            use rand::seq::SliceRandom;
            let mut perm: Vec<usize> = (0..self.n).collect();
            perm.shuffle(rng);
            perm
        }

        fn evaluate(&self, genome: &Vec<usize>) -> Vec<f64> {
            let n = self.n;
            let forward: usize = genome.iter().enumerate().map(|(i, &g)| i.abs_diff(g)).sum();
            let backward: usize = genome
                .iter()
                .enumerate()
                .map(|(i, &g)| (n - 1 - i).abs_diff(g))
                .sum();
            vec![forward as f64, backward as f64]
        }

        fn crossover<R: Rng>(&self, p1: &Vec<usize>, p2: &Vec<usize>, rng: &mut R) -> Vec<Vec<usize>> {
            let (c1, c2) = Crossover::Order.apply(p1, p2, rng);
            vec![c1, c2]
        }

        fn mutate<R: Rng>(&self, genome: &mut Vec<usize>, rng: &mut R) {
            Mutation::Swap.apply(genome, rng);
        }
    }

    pub(crate) fn all_algorithms() -> Vec<Algorithm> {
        vec![
            Algorithm::NsgaII {
                with_replacement: true,
            },
            Algorithm::NsgaII {
                with_replacement: false,
            },
            Algorithm::EpsilonMoea {
                epsilons: vec![1.0],
            },
            Algorithm::Decomposition {
                neighborhood_size: 4,
                delta: 0.9,
                eta: 2,
                update_utility: None,
            },
            Algorithm::Decomposition {
                neighborhood_size: 4,
                delta: 0.9,
                eta: 2,
                update_utility: Some(2),
            },
            Algorithm::WeightedScalar {
                weights: vec![1.0],
                aggregation: Aggregation::Linear,
            },
            Algorithm::WeightedScalar {
                weights: vec![1.0, 0.5],
                aggregation: Aggregation::MinMax,
            },
        ]
    }

    fn config() -> SearchConfig {
        SearchConfig::default()
            .with_population_size(20)
            .with_max_evaluations(600)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_every_algorithm_respects_budget() {
        let problem = TwoTargets { n: 8 };
        for algorithm in all_algorithms() {
            let result = SearchRunner::run(&problem, &algorithm, &config()).unwrap();
            assert!(!result.front.is_empty(), "{} returned an empty front", algorithm.name());
            assert!(
                result.evaluations <= 600,
                "{} overspent: {}",
                algorithm.name(),
                result.evaluations
            );
            assert!(result.generations > 0);
            assert!(!result.cancelled);
        }
    }

    #[test]
    fn test_fronts_are_mutually_nondominated() {
        let problem = TwoTargets { n: 8 };
        for algorithm in all_algorithms() {
            let front = SearchRunner::run(&problem, &algorithm, &config()).unwrap().front;
            for a in &front {
                for b in &front {
                    assert_ne!(
                        pareto_dominance(&a.objectives, &b.objectives),
                        Dominance::Left,
                        "{} front holds dominated members",
                        algorithm.name()
                    );
                }
            }
        }
    }

    #[test]
    fn test_front_objectives_match_genomes() {
        let problem = TwoTargets { n: 6 };
        for algorithm in all_algorithms() {
            let front = SearchRunner::run(&problem, &algorithm, &config()).unwrap().front;
            for solution in &front {
                assert_eq!(solution.objectives, problem.evaluate(&solution.genome));
            }
        }
    }

    #[test]
    fn test_seed_reproducibility() {
        let problem = TwoTargets { n: 8 };
        for algorithm in all_algorithms() {
            let a = SearchRunner::run(&problem, &algorithm, &config()).unwrap();
            let b = SearchRunner::run(&problem, &algorithm, &config()).unwrap();
            assert_eq!(a.front, b.front, "{} is not reproducible", algorithm.name());
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let problem = TwoTargets { n: 8 };
        for algorithm in all_algorithms() {
            let sequential = SearchRunner::run(&problem, &algorithm, &config()).unwrap();
            let parallel =
                SearchRunner::run(&problem, &algorithm, &config().with_parallel(true)).unwrap();
            assert_eq!(sequential.front, parallel.front);
        }
    }

    #[test]
    fn test_cancellation() {
        let problem = TwoTargets { n: 8 };
        let cancel = Arc::new(AtomicBool::new(true));
        let result = SearchRunner::run_with_cancel(
            &problem,
            &Algorithm::NsgaII {
                with_replacement: true,
            },
            &config().with_max_evaluations(1_000_000),
            Some(cancel),
        )
        .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.evaluations, 20);
        assert!(!result.front.is_empty());
    }

    #[test]
    fn test_time_limit_stops_run() {
        let problem = TwoTargets { n: 8 };
        let config = config()
            .with_max_evaluations(usize::MAX)
            .with_time_limit_ms(20);
        let result = SearchRunner::run(
            &problem,
            &Algorithm::EpsilonMoea {
                epsilons: vec![1.0],
            },
            &config,
        )
        .unwrap();
        assert!(!result.cancelled);
        assert!(result.evaluations < usize::MAX);
    }

    #[test]
    fn test_nsga2_improves_on_random() {
        let problem = TwoTargets { n: 10 };
        let result = SearchRunner::run(
            &problem,
            &Algorithm::NsgaII {
                with_replacement: true,
            },
            &config().with_max_evaluations(4000).with_population_size(40),
        )
        .unwrap();
        // the identity permutation has forward displacement 0
        let best_forward = result
            .front
            .iter()
            .map(|s| s.objectives[0])
            .fold(f64::INFINITY, f64::min);
        assert!(best_forward <= 16.0, "best forward displacement {best_forward}");
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let problem = TwoTargets { n: 4 };
        let bad = [
            Algorithm::EpsilonMoea {
                epsilons: vec![0.0],
            },
            Algorithm::Decomposition {
                neighborhood_size: 0,
                delta: 0.9,
                eta: 2,
                update_utility: None,
            },
            Algorithm::Decomposition {
                neighborhood_size: 3,
                delta: 1.5,
                eta: 2,
                update_utility: None,
            },
            Algorithm::Decomposition {
                neighborhood_size: 3,
                delta: 0.5,
                eta: 0,
                update_utility: None,
            },
            Algorithm::Decomposition {
                neighborhood_size: 3,
                delta: 0.5,
                eta: 1,
                update_utility: Some(0),
            },
            Algorithm::WeightedScalar {
                weights: vec![f64::NAN],
                aggregation: Aggregation::Linear,
            },
        ];
        for algorithm in bad {
            assert!(SearchRunner::run(&problem, &algorithm, &config()).is_err());
        }
        let invalid = config().with_population_size(1);
        assert!(SearchRunner::run(&problem, &all_algorithms()[0], &invalid).is_err());
    }
}
