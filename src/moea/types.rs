//! Core trait definitions for the multi-objective engine.
//!
//! [`MoProblem`] is the contract between the generic engine and a concrete
//! problem; [`Solution`] pairs a genome with its objective vector.

use rand::Rng;

/// A genome together with its evaluated objectives.
///
/// All objectives are **minimized**.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<G> {
    /// Problem-specific genome.
    pub genome: G,

    /// One value per objective.
    pub objectives: Vec<f64>,
}

impl<G> Solution<G> {
    /// Creates a solution from an already evaluated genome.
    pub fn new(genome: G, objectives: Vec<f64>) -> Self {
        Self { genome, objectives }
    }
}

/// Defines a multi-objective optimization problem.
///
/// Implementors provide genome creation, evaluation, and variation. The
/// engine owns everything else: population management, selection, archives,
/// and termination.
///
/// # Thread Safety
///
/// `MoProblem` must be `Send + Sync` because the engine evaluates each
/// generation's offspring in parallel when the `parallel` feature is on.
/// `evaluate` must not depend on any state shared between calls.
pub trait MoProblem: Send + Sync {
    /// Genome representation.
    type Genome: Clone + Send + Sync;

    /// Number of objectives returned by [`evaluate`](Self::evaluate).
    fn objective_count(&self) -> usize;

    /// Creates a random genome.
    fn create_genome<R: Rng>(&self, rng: &mut R) -> Self::Genome;

    /// Creates the starting population.
    ///
    /// The default calls [`create_genome`](Self::create_genome) `size` times.
    fn initial_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Self::Genome> {
        (0..size).map(|_| self.create_genome(rng)).collect()
    }

    /// Computes the objective vector of a genome (lower is better).
    fn evaluate(&self, genome: &Self::Genome) -> Vec<f64>;

    /// Recombines two parents into one or more children.
    ///
    /// The default clones the first parent.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Genome,
        _parent2: &Self::Genome,
        _rng: &mut R,
    ) -> Vec<Self::Genome> {
        vec![parent1.clone()]
    }

    /// Perturbs a genome in place. The default is a no-op.
    fn mutate<R: Rng>(&self, _genome: &mut Self::Genome, _rng: &mut R) {}
}
