//! Feasibility check and three-objective fitness.
//!
//! A chromosome is decoded into routes and checked against the hard
//! constraints. Feasible chromosomes score three minimized objectives:
//!
//! | Index | Objective | Value |
//! |-------|-----------|-------|
//! | 0 | Route count | `routes + min_duration / task_count` |
//! | 1 | Total duration | `Σ (last eta − first eta)` |
//! | 2 | Imbalance | `max_duration − total / routes` |
//!
//! Infeasible chromosomes score [`INFEASIBLE`] on every objective, which is
//! dominated by any feasible point.

use super::decode::decode;
use super::encoding::decode_keys;
use crate::model::{Instance, PerformerId, Route};
use std::fmt;

/// Number of objectives.
pub const OBJECTIVE_COUNT: usize = 3;

/// Objective vector of a chromosome.
pub type Objectives = [f64; OBJECTIVE_COUNT];

/// Sentinel objective value of an infeasible chromosome (`i32::MAX - 1`).
pub const INFEASIBLE: f64 = (i32::MAX - 1) as f64;

/// Objective vector assigned to infeasible chromosomes.
pub const INFEASIBLE_OBJECTIVES: Objectives = [INFEASIBLE; OBJECTIVE_COUNT];

/// Returns `true` if no objective reached the infeasibility sentinel.
pub fn is_feasible(objectives: &[f64]) -> bool {
    objectives.iter().all(|&v| v < INFEASIBLE)
}

/// A violated hard constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// More routes than performers.
    TooManyRoutes {
        /// Produced routes.
        routes: usize,
        /// Available performers.
        performers: usize,
    },

    /// A pinned task ended up on another performer's route.
    PerformerReassigned {
        /// Task index.
        task: usize,
        /// Pinned performer.
        expected: PerformerId,
        /// Performer of the route holding the task.
        actual: Option<PerformerId>,
    },

    /// Chromosome length differs from the task count.
    WrongLength {
        /// Chromosome length.
        len: usize,
        /// Task count.
        tasks: usize,
    },

    /// A gene is not a task index.
    TaskOutOfRange(usize),

    /// A task index occurs more than once.
    DuplicateTask(usize),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooManyRoutes { routes, performers } => {
                write!(f, "{routes} routes for {performers} performers")
            }
            Violation::PerformerReassigned {
                task,
                expected,
                actual,
            } => write!(f, "task {task} pinned to {expected:?} but routed to {actual:?}"),
            Violation::WrongLength { len, tasks } => {
                write!(f, "chromosome has {len} genes for {tasks} tasks")
            }
            Violation::TaskOutOfRange(gene) => write!(f, "gene {gene} is not a task index"),
            Violation::DuplicateTask(task) => write!(f, "task {task} appears more than once"),
        }
    }
}

/// Checks the chromosome itself: right length, valid indices, no duplicates.
pub fn check_chromosome(chromosome: &[usize], task_count: usize) -> Result<(), Violation> {
    if chromosome.len() != task_count {
        return Err(Violation::WrongLength {
            len: chromosome.len(),
            tasks: task_count,
        });
    }
    let mut seen = vec![false; task_count];
    for &gene in chromosome {
        if gene >= task_count {
            return Err(Violation::TaskOutOfRange(gene));
        }
        if std::mem::replace(&mut seen[gene], true) {
            return Err(Violation::DuplicateTask(gene));
        }
    }
    Ok(())
}

/// Checks decoded routes against the hard constraints.
///
/// Reports the first violation found, checking route count first, then
/// pinned performers, then the chromosome itself.
pub fn check(instance: &Instance, chromosome: &[usize], routes: &[Route]) -> Result<(), Violation> {
    if routes.len() > instance.performers().len() {
        return Err(Violation::TooManyRoutes {
            routes: routes.len(),
            performers: instance.performers().len(),
        });
    }

    if instance.keep_performers() {
        for route in routes {
            for &task in &route.tasks {
                if let Some(expected) = instance.tasks()[task].performer {
                    if route.performer != Some(expected) {
                        return Err(Violation::PerformerReassigned {
                            task,
                            expected,
                            actual: route.performer,
                        });
                    }
                }
            }
        }
    }

    check_chromosome(chromosome, instance.task_count())
}

/// Objectives of a feasible route set.
///
/// Empty routes are ignored. An empty route set scores zero on every
/// objective.
pub fn objectives(routes: &[Route], task_count: usize) -> Objectives {
    let durations: Vec<f64> = routes
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| r.duration() as f64)
        .collect();

    if durations.is_empty() {
        return [0.0; OBJECTIVE_COUNT];
    }

    let count = durations.len() as f64;
    let total: f64 = durations.iter().sum();
    let shortest = durations.iter().copied().fold(f64::INFINITY, f64::min);
    let longest = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    [
        count + shortest / task_count.max(1) as f64,
        total,
        longest - total / count,
    ]
}

/// Decoded routes together with their score.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Decoded routes (may include empty filler routes).
    pub routes: Vec<Route>,

    /// Objective vector, or [`INFEASIBLE_OBJECTIVES`].
    pub objectives: Objectives,

    /// Violated constraint, if any.
    pub violation: Option<Violation>,
}

impl Evaluation {
    /// Returns `true` if all hard constraints hold.
    pub fn is_feasible(&self) -> bool {
        self.violation.is_none()
    }
}

/// Decodes and scores a task permutation.
///
/// Genes outside the task range are reported as a violation instead of
/// being decoded.
pub fn evaluate(instance: &Instance, chromosome: &[usize]) -> Evaluation {
    if let Some(&gene) = chromosome.iter().find(|&&g| g >= instance.task_count()) {
        return Evaluation {
            routes: Vec::new(),
            objectives: INFEASIBLE_OBJECTIVES,
            violation: Some(Violation::TaskOutOfRange(gene)),
        };
    }

    let routes = decode(chromosome, instance);
    match check(instance, chromosome, &routes) {
        Ok(()) => Evaluation {
            objectives: objectives(&routes, instance.task_count()),
            routes,
            violation: None,
        },
        Err(violation) => Evaluation {
            routes,
            objectives: INFEASIBLE_OBJECTIVES,
            violation: Some(violation),
        },
    }
}

/// Scores a bounded real-key chromosome.
///
/// Keys are floored to task indices; keys that collapse onto the same index
/// make the chromosome infeasible.
pub fn evaluate_keys(instance: &Instance, keys: &[f64]) -> Evaluation {
    evaluate(instance, &decode_keys(keys))
}
