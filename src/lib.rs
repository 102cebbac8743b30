//! Time-windowed vehicle routing with multi-objective evolutionary search.
//!
//! Assigns delivery tasks with arrival windows to a bounded pool of
//! performers. A chromosome is a task permutation; a greedy decoder builds
//! routes from it, and a multi-objective search minimizes route count,
//! total duration, and imbalance.
//!
//! - **Model** ([`model`]): tasks, performers, travel-time matrix, routes.
//! - **Routing** ([`routing`]): permutation decoder, feasibility check,
//!   three-objective fitness, bounded real-key encoding.
//! - **Search engine** ([`moea`]): generic population loop with NSGA-II,
//!   ε-MOEA, MOEA/D, and a weighted single-objective GA.
//! - **Strategies** ([`strategy`]): named strategies configured from string
//!   properties.
//! - **Solver** ([`solver`]): runs a strategy, extracts the best feasible
//!   plan, and escalates the budget on failure.
//!
//! # Example
//!
//! ```
//! use u_vrptw::model::{PerformerId, Task, TaskId, TravelTimeMatrix};
//! use u_vrptw::solver::{solve, SolverConfig};
//!
//! let tasks = vec![
//!     Task::new(TaskId(0), 0, 10),
//!     Task::new(TaskId(1), 5, 15),
//!     Task::new(TaskId(2), 20, 30),
//! ];
//! let matrix = TravelTimeMatrix::new(vec![
//!     vec![0, 5, 50],
//!     vec![5, 0, 10],
//!     vec![50, 10, 0],
//! ]).unwrap();
//!
//! let config = SolverConfig::default().with_seed(7);
//! let plan = solve(tasks, vec![PerformerId(1), PerformerId(2)], matrix, false, &config)
//!     .unwrap()
//!     .expect("feasible plan");
//! assert_eq!(plan.routes.iter().map(|r| r.len()).sum::<usize>(), 3);
//! ```
//!
//! # Logging
//!
//! Progress is reported through the [`log`] facade: one `info` line per
//! solver round, `warn` on escalation and exhaustion, `debug`/`trace` from
//! the engine. Install any logger to see it.

pub mod error;
pub mod model;
pub mod moea;
pub mod routing;
pub mod solver;
pub mod strategy;

pub use error::{ConfigError, SolveError};
