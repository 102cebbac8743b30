//! Solver output.

use crate::model::{Instance, PerformerId, Route, TaskId};
use crate::routing::Objectives;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A feasible assignment of every task to a route.
///
/// Only non-empty routes are listed. Every plan returned by the solver has
/// passed the full feasibility check.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoutePlan {
    /// Routes in decode order.
    pub routes: Vec<Route>,

    /// Objective vector of the plan: route count score, total duration,
    /// imbalance.
    pub objectives: Objectives,

    /// Number of driver rounds it took to find the plan.
    pub rounds: usize,

    /// Evaluations spent over all rounds.
    pub evaluations: usize,
}

impl RoutePlan {
    /// Plan of an instance without tasks.
    pub(crate) fn empty() -> Self {
        Self {
            routes: Vec::new(),
            objectives: [0.0; 3],
            rounds: 0,
            evaluations: 0,
        }
    }

    /// Number of routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Visits per performer as `(performer, task id, eta)` in route order.
    ///
    /// Routes beyond the performer pool have no performer.
    pub fn assignments<'a>(
        &'a self,
        instance: &'a Instance,
    ) -> impl Iterator<Item = (Option<PerformerId>, TaskId, i64)> + 'a {
        self.routes.iter().flat_map(move |route| {
            route
                .tasks
                .iter()
                .zip(&route.eta)
                .map(move |(&task, &eta)| (route.performer, instance.tasks()[task].id, eta))
        })
    }
}
