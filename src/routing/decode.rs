//! Permutation-to-routes decoder.
//!
//! Turns a task permutation into concrete routes with a greedy constructive
//! heuristic. Genes are processed in order; each task is admitted by the
//! first rule that accepts it:
//!
//! 1. **Pinned continuation** (only with `keep_performers`): the route of the
//!    pinned performer's slot, created on demand together with empty filler
//!    routes so that route `k` stays bound to `performers[k]`.
//! 2. **On-time append**: the first route (creation order) that is empty, or
//!    whose extension arrives inside the task window.
//! 3. **Wait append**: the first route whose extension arrives before the
//!    window opens; the arrival is clamped up to the window start.
//! 4. **New route**: bound to the next unused performer, or unassigned when
//!    every performer already has a route.
//!
//! Decoding is a pure function of its inputs: all bookkeeping lives on the
//! stack of a single call.

use crate::model::{Instance, Route};

/// Decodes a task permutation into routes.
///
/// The chromosome is consumed gene by gene; it is not required to be a
/// permutation (duplicates are decoded as repeated visits and rejected later
/// by the feasibility check).
///
/// The result may contain empty filler routes created for pinned
/// continuation.
///
/// # Panics
/// Panics if a gene is not a valid task index.
///
/// # Examples
///
/// ```
/// use u_vrptw::model::{Instance, PerformerId, Task, TaskId, TravelTimeMatrix};
/// use u_vrptw::routing::decode;
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
/// let instance = Instance::new(tasks, vec![PerformerId(0), PerformerId(1)], matrix, false).unwrap();
///
/// let routes = decode(&[0, 1, 2], &instance);
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].tasks, vec![0, 1, 2]);
/// assert_eq!(routes[0].eta, vec![0, 5, 20]);
/// ```
pub fn decode(chromosome: &[usize], instance: &Instance) -> Vec<Route> {
    let mut routes: Vec<Route> = Vec::new();

    for &task in chromosome {
        let admitted = admit_pinned(&mut routes, task, instance)
            || admit_on_time(&mut routes, task, instance)
            || admit_with_wait(&mut routes, task, instance);

        if !admitted {
            let performer = instance.performers().get(routes.len()).copied();
            let mut route = Route::new(performer);
            route.push(task, instance.tasks()[task].start);
            routes.push(route);
        }
    }

    routes
}

/// Arrival at `task` when appended to `route`, or `None` for an empty route.
///
/// Saturates at `i64::MAX`, which no window short of `i64::MAX` accepts.
#[inline]
fn extension(route: &Route, task: usize, instance: &Instance) -> Option<i64> {
    route
        .last()
        .map(|(last, eta)| eta.saturating_add(instance.matrix().get(last, task)))
}

/// Rule 1: keep a pinned task on its performer's route.
fn admit_pinned(routes: &mut Vec<Route>, task: usize, instance: &Instance) -> bool {
    let Some(slot) = instance.pinned_slot(task) else {
        return false;
    };

    while routes.len() <= slot {
        let performer = instance.performers()[routes.len()];
        routes.push(Route::new(Some(performer)));
    }

    let window = &instance.tasks()[task];
    let route = &mut routes[slot];
    match extension(route, task, instance) {
        None => {
            route.push(task, window.start);
            true
        }
        Some(eta) if window.accepts(eta) => {
            route.push(task, eta);
            true
        }
        Some(_) => false,
    }
}

/// Rule 2: first route that is empty or reaches the task inside its window.
fn admit_on_time(routes: &mut [Route], task: usize, instance: &Instance) -> bool {
    let window = &instance.tasks()[task];
    for route in routes.iter_mut() {
        match extension(route, task, instance) {
            None => {
                route.push(task, window.start);
                return true;
            }
            Some(eta) if window.accepts(eta) => {
                route.push(task, eta);
                return true;
            }
            Some(_) => {}
        }
    }
    false
}

/// Rule 3: first route that arrives early; the performer waits for the window.
fn admit_with_wait(routes: &mut [Route], task: usize, instance: &Instance) -> bool {
    let window = &instance.tasks()[task];
    for route in routes.iter_mut() {
        if let Some(eta) = extension(route, task, instance) {
            if eta < window.start {
                route.push(task, window.start);
                return true;
            }
        }
    }
    false
}
