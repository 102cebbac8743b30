//! Adapter exposing a routing [`Instance`] to the search engine.

use super::encoding::{decode_keys, initialize};
use super::fitness::{evaluate, OBJECTIVE_COUNT};
use crate::model::Instance;
use crate::moea::{Crossover, MoProblem, Mutation};
use rand::seq::SliceRandom;
use rand::Rng;

/// Routing instance viewed as a 3-objective permutation problem.
///
/// The genome is a task permutation. Generation zero comes from distinct
/// shuffles so that no two starting individuals coincide.
#[derive(Debug, Clone)]
pub struct RoutingProblem<'a> {
    instance: &'a Instance,
    crossover: Crossover,
    mutation: Mutation,
}

impl<'a> RoutingProblem<'a> {
    /// Creates the adapter with default operators (OX, swap).
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            crossover: Crossover::default(),
            mutation: Mutation::default(),
        }
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the mutation operator.
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// The wrapped instance.
    pub fn instance(&self) -> &Instance {
        self.instance
    }

    /// ε-box sizes used when none are configured: half a route on the route
    /// count, one percent of the planning horizon (at least one time unit)
    /// on both durations.
    pub fn default_epsilon(&self) -> Vec<f64> {
        let duration = (self.instance.horizon() as f64 / 100.0).max(1.0);
        vec![0.5, duration, duration]
    }
}

impl MoProblem for RoutingProblem<'_> {
    type Genome = Vec<usize>;

    fn objective_count(&self) -> usize {
        OBJECTIVE_COUNT
    }

    fn create_genome<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let mut permutation: Vec<usize> = (0..self.instance.task_count()).collect();
        permutation.shuffle(rng);
        permutation
    }

    fn initial_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Vec<usize>> {
        initialize(self.instance.task_count(), size, rng)
            .iter()
            .map(|keys| decode_keys(keys))
            .collect()
    }

    fn evaluate(&self, genome: &Vec<usize>) -> Vec<f64> {
        evaluate(self.instance, genome).objectives.to_vec()
    }

    fn crossover<R: Rng>(&self, parent1: &Vec<usize>, parent2: &Vec<usize>, rng: &mut R) -> Vec<Vec<usize>> {
        let (child1, child2) = self.crossover.apply(parent1, parent2, rng);
        vec![child1, child2]
    }

    fn mutate<R: Rng>(&self, genome: &mut Vec<usize>, rng: &mut R) {
        self.mutation.apply(genome, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PerformerId, Task, TaskId, TravelTimeMatrix};
    use crate::routing::fitness::is_feasible;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn instance() -> Instance {
        let tasks = (0..6)
            .map(|i| Task::new(TaskId(i), i as i64 * 10, i as i64 * 10 + 500))
            .collect();
        Instance::new(
            tasks,
            vec![PerformerId(1), PerformerId(2)],
            TravelTimeMatrix::uniform(6, 3),
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_initial_population_distinct_and_feasible() {
        let instance = instance();
        let problem = RoutingProblem::new(&instance);
        let mut rng = StdRng::seed_from_u64(9);
        let population = problem.initial_population(30, &mut rng);

        assert_eq!(population.len(), 30);
        let distinct: HashSet<&Vec<usize>> = population.iter().collect();
        assert_eq!(distinct.len(), 30);
        for genome in &population {
            assert!(is_feasible(&problem.evaluate(genome)));
        }
    }

    #[test]
    fn test_variation_keeps_permutations() {
        let instance = instance();
        let problem = RoutingProblem::new(&instance)
            .with_crossover(Crossover::PartiallyMapped)
            .with_mutation(Mutation::Invert);
        let mut rng = StdRng::seed_from_u64(2);
        let a = problem.create_genome(&mut rng);
        let b = problem.create_genome(&mut rng);

        for mut child in problem.crossover(&a, &b, &mut rng) {
            problem.mutate(&mut child, &mut rng);
            let mut sorted = child.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..6).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_default_epsilon() {
        let instance = instance();
        let problem = RoutingProblem::new(&instance);
        // horizon 0..550
        assert_eq!(problem.default_epsilon(), vec![0.5, 5.5, 5.5]);

        let short = Instance::new(
            vec![Task::new(TaskId(0), 0, 20)],
            vec![PerformerId(1)],
            TravelTimeMatrix::uniform(1, 0),
            false,
        )
        .unwrap();
        assert_eq!(RoutingProblem::new(&short).default_epsilon(), vec![0.5, 1.0, 1.0]);
    }
}
