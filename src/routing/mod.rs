//! Routing layer: decoding, feasibility, objectives, and encoding.
//!
//! A chromosome is a permutation of task indices. [`decode`] turns it into
//! routes, [`evaluate`] checks the hard constraints and scores the result,
//! and [`RoutingProblem`] exposes an instance to the search engine.
//!
//! # Key Types
//!
//! - [`Evaluation`]: routes, objectives, and the violated constraint if any
//! - [`Violation`]: which hard constraint a chromosome breaks
//! - [`RoutingProblem`]: [`MoProblem`](crate::moea::MoProblem) adapter

mod decode;
mod encoding;
mod fitness;
mod problem;

pub use decode::decode;
pub use encoding::{decode_keys, encode, initialize, key_upper_bound, KEY_EPSILON};
pub use fitness::{
    check, check_chromosome, evaluate, evaluate_keys, is_feasible, objectives, Evaluation, Objectives, Violation,
    INFEASIBLE, INFEASIBLE_OBJECTIVES, OBJECTIVE_COUNT,
};
pub use problem::RoutingProblem;
