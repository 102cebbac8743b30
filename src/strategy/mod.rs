//! Strategy adapter.
//!
//! Maps a strategy name plus string properties onto a fully parameterized
//! [`Algorithm`](crate::moea::Algorithm) for the search engine.
//!
//! # Strategies
//!
//! - `"NSGA-II"`: generational, rank + crowding
//! - `"eMOEA"` (default): steady-state with an ε-box dominance archive
//! - `"MOEA/D"`: Tchebycheff decomposition
//! - `"GeneticAlgorithm"`: single-objective GA over `linear` or `min-max`
//!   aggregated objectives

mod config;
mod properties;
mod variation;

pub use config::StrategyConfig;
pub use properties::Properties;
pub use variation::Variation;
