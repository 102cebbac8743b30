//! Adaptive driver.
//!
//! [`Solver`] runs the configured strategy, picks the feasible front member
//! with the lowest ranking objective, and escalates the budget (evaluations
//! ×2, population +50 by default) over up to three rounds before giving up
//! with `Ok(None)`.

mod config;
mod driver;
mod plan;

pub use config::SolverConfig;
pub use driver::{ranking_objective, solve, Solver};
pub use plan::RoutePlan;
