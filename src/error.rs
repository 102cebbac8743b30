//! Error types surfaced to callers.
//!
//! Infeasible candidates are never errors: they are scored with sentinel
//! objectives inside the search. Likewise, a search that finds no feasible
//! solution returns `Ok(None)` from the solver.

use crate::model::ModelError;

/// Invalid configuration. Fatal and never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Strategy name not recognized.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Aggregation method of the single-objective strategy not recognized.
    #[error("unrecognized weighting method: {0}")]
    UnknownWeightingMethod(String),

    /// Operator name not recognized.
    #[error("unknown {kind} operator: {name}")]
    UnknownOperator {
        /// `crossover` or `mutation`.
        kind: &'static str,
        /// Rejected name.
        name: String,
    },

    /// A property value could not be parsed.
    #[error("invalid value {value:?} for property {key}")]
    InvalidProperty {
        /// Property key.
        key: String,
        /// Raw value.
        value: String,
    },

    /// A numeric parameter is out of range.
    #[error("{0}")]
    OutOfRange(&'static str),
}

/// Errors returned by [`crate::solver::Solver`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    /// Inputs do not form a valid instance.
    #[error("invalid instance: {0}")]
    Model(#[from] ModelError),

    /// Solver or strategy configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
