//! Adaptive driver.
//!
//! Runs the configured strategy, picks the best feasible member of the
//! returned front, and escalates the budget when the front holds none.

use super::config::SolverConfig;
use super::plan::RoutePlan;
use crate::error::{ConfigError, SolveError};
use crate::model::{Instance, PerformerId, Route, Task, TravelTimeMatrix};
use crate::moea::{SearchRunner, Solution};
use crate::routing::{evaluate, is_feasible, Objectives, RoutingProblem, OBJECTIVE_COUNT};
use std::cmp::Ordering;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Objective minimized when picking from the front: total duration, or
/// imbalance when tasks are pinned to performers.
pub fn ranking_objective(keep_performers: bool) -> usize {
    if keep_performers {
        2
    } else {
        1
    }
}

/// Solves routing instances with escalation.
///
/// # Examples
///
/// ```
/// use u_vrptw::model::{Instance, PerformerId, Task, TaskId, TravelTimeMatrix};
/// use u_vrptw::solver::{Solver, SolverConfig};
///
/// let tasks = vec![
///     Task::new(TaskId(0), 0, 10),
///     Task::new(TaskId(1), 5, 15),
///     Task::new(TaskId(2), 20, 30),
/// ];
/// let matrix = TravelTimeMatrix::new(vec![
///     vec![0, 5, 50],
///     vec![5, 0, 10],
///     vec![50, 10, 0],
/// ]).unwrap();
/// let instance = Instance::new(tasks, vec![PerformerId(1), PerformerId(2)], matrix, false).unwrap();
///
/// let solver = Solver::new(SolverConfig::default().with_seed(1)).unwrap();
/// let plan = solver.solve(&instance).unwrap().expect("feasible");
/// assert!(plan.route_count() <= 2);
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Creates a solver.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds a feasible plan, or `Ok(None)` when every round fails.
    pub fn solve(&self, instance: &Instance) -> Result<Option<RoutePlan>, SolveError> {
        self.solve_with_cancel(instance, None)
    }

    /// Like [`solve`](Self::solve), with an optional cancellation token.
    ///
    /// Cancellation stops the current round between generations; the best
    /// feasible member found so far is still returned, and no further round
    /// is started.
    pub fn solve_with_cancel(
        &self,
        instance: &Instance,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Option<RoutePlan>, SolveError> {
        if instance.task_count() == 0 {
            return Ok(Some(RoutePlan::empty()));
        }

        let config = &self.config;
        let problem = RoutingProblem::new(instance)
            .with_crossover(config.crossover)
            .with_mutation(config.mutation);
        let default_epsilon = problem.default_epsilon();
        let ranking = ranking_objective(instance.keep_performers());

        let mut evaluations = 0;
        for round in 0..config.max_rounds {
            let search = config.round_search(round);
            let (algorithm, population_size) =
                config
                    .strategy
                    .resolve(search.population_size, OBJECTIVE_COUNT, &default_epsilon)?;
            let search = search.with_population_size(population_size);

            log::info!(
                "round {}/{}: {} over {} tasks, {} evaluations, population {}",
                round + 1,
                config.max_rounds,
                algorithm.name(),
                instance.task_count(),
                search.max_evaluations,
                search.population_size
            );

            let result = SearchRunner::run_with_cancel(&problem, &algorithm, &search, cancel.clone())?;
            evaluations += result.evaluations;

            if let Some((routes, objectives)) = best_feasible(instance, &result.front, ranking) {
                log::info!(
                    "round {}: feasible plan with {} routes, objectives {:?}",
                    round + 1,
                    routes.len(),
                    objectives
                );
                return Ok(Some(RoutePlan {
                    routes,
                    objectives,
                    rounds: round + 1,
                    evaluations,
                }));
            }

            if result.cancelled {
                log::warn!("search cancelled in round {} without a feasible plan", round + 1);
                return Ok(None);
            }
            if round + 1 < config.max_rounds {
                log::warn!(
                    "round {}: no feasible member in a front of {}, escalating",
                    round + 1,
                    result.front.len()
                );
            }
        }

        log::warn!(
            "no feasible plan after {} rounds and {} evaluations",
            config.max_rounds,
            evaluations
        );
        Ok(None)
    }
}

/// Builds the instance and solves it in one call.
pub fn solve(
    tasks: Vec<Task>,
    performers: Vec<PerformerId>,
    matrix: TravelTimeMatrix,
    keep_performers: bool,
    config: &SolverConfig,
) -> Result<Option<RoutePlan>, SolveError> {
    let instance = Instance::new(tasks, performers, matrix, keep_performers)?;
    Solver::new(config.clone())?.solve(&instance)
}

/// Feasible front member with the lowest ranking objective, decoded and
/// re-checked, with empty filler routes removed.
fn best_feasible(
    instance: &Instance,
    front: &[Solution<Vec<usize>>],
    ranking: usize,
) -> Option<(Vec<Route>, Objectives)> {
    let mut candidates: Vec<&Solution<Vec<usize>>> =
        front.iter().filter(|s| is_feasible(&s.objectives)).collect();
    candidates.sort_by(|a, b| {
        a.objectives[ranking]
            .partial_cmp(&b.objectives[ranking])
            .unwrap_or(Ordering::Equal)
    });

    candidates.into_iter().find_map(|candidate| {
        let evaluation = evaluate(instance, &candidate.genome);
        if !evaluation.is_feasible() {
            log::warn!("front member failed re-check: {:?}", evaluation.violation);
            return None;
        }
        let routes = evaluation.routes.into_iter().filter(|r| !r.is_empty()).collect();
        Some((routes, evaluation.objectives))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskId;
    use crate::routing::INFEASIBLE;
    use crate::strategy::StrategyConfig;
    use std::collections::HashSet;

    fn three_task_instance(keep: bool) -> Instance {
        let tasks = vec![
            Task::new(TaskId(0), 0, 10),
            Task::new(TaskId(1), 5, 15),
            Task::new(TaskId(2), 20, 30),
        ];
        let matrix = TravelTimeMatrix::new(vec![vec![0, 5, 50], vec![5, 0, 10], vec![50, 10, 0]]).unwrap();
        Instance::new(tasks, vec![PerformerId(1), PerformerId(2)], matrix, keep).unwrap()
    }

    /// Eight tasks, wide windows, three performers.
    fn wide_instance() -> Instance {
        let tasks = (0..8u128)
            .map(|i| Task::new(TaskId(i), (i as i64) * 15, (i as i64) * 15 + 120))
            .collect();
        let rows = (0..8i64)
            .map(|a| (0..8i64).map(|b| if a == b { 0 } else { 5 + (a - b).abs() * 3 }).collect())
            .collect();
        Instance::new(
            tasks,
            vec![PerformerId(10), PerformerId(11), PerformerId(12)],
            TravelTimeMatrix::new(rows).unwrap(),
            false,
        )
        .unwrap()
    }

    fn small_config() -> SolverConfig {
        SolverConfig::default()
            .with_max_evaluations(400)
            .with_population_size(20)
            .with_escalation(2, 10)
            .with_parallel(false)
            .with_seed(42)
    }

    fn assert_valid_plan(instance: &Instance, plan: &RoutePlan) {
        let mut seen = HashSet::new();
        for route in &plan.routes {
            assert!(!route.is_empty());
            assert_eq!(route.tasks.len(), route.eta.len());
            for (&task, &eta) in route.tasks.iter().zip(&route.eta) {
                assert!(seen.insert(task), "task {task} scheduled twice");
                let t = &instance.tasks()[task];
                assert!(t.start <= eta && eta <= t.end);
            }
        }
        assert_eq!(seen.len(), instance.task_count());
        assert!(plan.routes.len() <= instance.performers().len());
        assert!(plan.objectives.iter().all(|&v| v < INFEASIBLE));
    }

    #[test]
    fn test_three_task_scenario() {
        let instance = three_task_instance(false);
        let plan = Solver::new(small_config()).unwrap().solve(&instance).unwrap().unwrap();
        assert_valid_plan(&instance, &plan);
        // [T1, T0] + [T2] or [T2] + [T0, T1]: total duration 5
        assert_eq!(plan.objectives[1], 5.0);
        assert_eq!(plan.rounds, 1);
    }

    #[test]
    fn test_every_strategy_finds_plan() {
        let instance = wide_instance();
        for name in ["NSGA-II", "eMOEA", "MOEA/D", "GeneticAlgorithm"] {
            let config = small_config().with_strategy(name.parse().unwrap());
            let plan = Solver::new(config).unwrap().solve(&instance).unwrap();
            let plan = plan.unwrap_or_else(|| panic!("{name} found no plan"));
            assert_valid_plan(&instance, &plan);
            assert!(plan.evaluations > 0);
        }
    }

    #[test]
    fn test_infeasible_instance_returns_none() {
        // two simultaneous zero-width windows, one performer
        let tasks = vec![Task::new(TaskId(0), 0, 0), Task::new(TaskId(1), 0, 0)];
        let instance = Instance::new(tasks, vec![PerformerId(1)], TravelTimeMatrix::uniform(2, 5), false).unwrap();
        let result = Solver::new(small_config()).unwrap().solve(&instance).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_empty_instance() {
        let instance = Instance::new(Vec::new(), vec![PerformerId(1)], TravelTimeMatrix::uniform(0, 0), false).unwrap();
        let plan = Solver::new(small_config()).unwrap().solve(&instance).unwrap().unwrap();
        assert!(plan.routes.is_empty());
        assert_eq!(plan.evaluations, 0);
    }

    #[test]
    fn test_pinned_tasks_keep_performer() {
        let tasks = vec![
            Task::new(TaskId(0), 0, 100).with_performer(PerformerId(2)),
            Task::new(TaskId(1), 0, 100),
            Task::new(TaskId(2), 50, 100).with_performer(PerformerId(2)),
        ];
        let instance = Instance::new(
            tasks,
            vec![PerformerId(1), PerformerId(2)],
            TravelTimeMatrix::uniform(3, 1),
            true,
        )
        .unwrap();
        let plan = Solver::new(small_config()).unwrap().solve(&instance).unwrap().unwrap();
        assert_valid_plan(&instance, &plan);

        let pinned: Vec<&Route> = plan
            .routes
            .iter()
            .filter(|r| r.tasks.contains(&0) || r.tasks.contains(&2))
            .collect();
        assert!(pinned.iter().all(|r| r.performer == Some(PerformerId(2))));

        let assigned: Vec<(Option<PerformerId>, TaskId, i64)> = plan.assignments(&instance).collect();
        assert_eq!(assigned.len(), 3);
    }

    #[test]
    fn test_cancelled_run_does_not_escalate() {
        let tasks = vec![Task::new(TaskId(0), 0, 0), Task::new(TaskId(1), 0, 0)];
        let instance = Instance::new(tasks, vec![PerformerId(1)], TravelTimeMatrix::uniform(2, 5), false).unwrap();
        let cancel = Arc::new(AtomicBool::new(true));
        let solver = Solver::new(small_config()).unwrap();
        assert_eq!(solver.solve_with_cancel(&instance, Some(cancel.clone())).unwrap(), None);

        // a feasible instance still yields the initial population's best
        let instance = three_task_instance(false);
        let plan = solver.solve_with_cancel(&instance, Some(cancel)).unwrap().unwrap();
        assert_eq!(plan.rounds, 1);
        assert_valid_plan(&instance, &plan);
    }

    #[test]
    fn test_seeded_solve_is_reproducible() {
        let instance = wide_instance();
        let solver = Solver::new(small_config().with_strategy(StrategyConfig::default())).unwrap();
        assert_eq!(solver.solve(&instance).unwrap(), solver.solve(&instance).unwrap());
    }

    #[test]
    fn test_free_function_surfaces_errors() {
        let tasks = vec![Task::new(TaskId(0), 10, 0)];
        let err = solve(tasks, vec![PerformerId(1)], TravelTimeMatrix::uniform(1, 0), false, &small_config());
        assert!(matches!(err, Err(SolveError::Model(_))));

        let tasks = vec![Task::new(TaskId(0), 0, 10)];
        let err = solve(
            tasks,
            vec![PerformerId(1)],
            TravelTimeMatrix::uniform(1, 0),
            false,
            &small_config().with_max_rounds(0),
        );
        assert!(matches!(err, Err(SolveError::Config(_))));
    }

    #[test]
    fn test_extreme_time_values_solve() {
        let tasks = vec![Task::new(TaskId(0), i64::MIN, 0), Task::new(TaskId(1), 0, i64::MAX)];
        let instance = Instance::new(
            tasks,
            vec![PerformerId(1), PerformerId(2)],
            TravelTimeMatrix::uniform(2, i64::MAX),
            false,
        )
        .unwrap();
        let plan = Solver::new(small_config()).unwrap().solve(&instance).unwrap().unwrap();
        assert_valid_plan(&instance, &plan);
    }

    #[test]
    fn test_ranking_objective() {
        assert_eq!(ranking_objective(false), 1);
        assert_eq!(ranking_objective(true), 2);
    }
}
