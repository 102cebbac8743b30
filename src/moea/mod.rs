//! Multi-objective evolutionary search engine.
//!
//! A generic engine over problems implementing [`MoProblem`]. All
//! objectives are minimized. Four algorithms share one population loop and
//! differ in selection, replacement, and archiving:
//!
//! - [`Algorithm::NsgaII`]: non-dominated sorting with crowding distance
//! - [`Algorithm::EpsilonMoea`]: steady-state with an ε-box archive
//! - [`Algorithm::Decomposition`]: MOEA/D with Tchebycheff subproblems
//! - [`Algorithm::WeightedScalar`]: single-objective GA over an aggregate
//!
//! Offspring are evaluated in parallel (rayon, `parallel` feature); each
//! algorithm waits for the whole batch before selecting or replacing, so a
//! fixed seed gives the same result with or without parallelism.
//!
//! # Key Types
//!
//! - [`SearchConfig`]: budget, variation rates, seed, time limit
//! - [`SearchRunner`]: executes the loop
//! - [`SearchResult`]: final front with statistics
//!
//! # Submodules
//!
//! - [`operators`]: permutation crossover (OX, PMX) and mutation operators
//! - [`multi_objective`]: Pareto dominance, non-dominated sorting, crowding
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Deb, Mohan & Mishra (2003), *A Fast Multi-objective Evolutionary
//!   Algorithm for Finding Well-Spread Pareto-Optimal Solutions*
//! - Zhang & Li (2007), *MOEA/D: A Multiobjective Evolutionary Algorithm
//!   Based on Decomposition*

mod archive;
mod config;
mod emoea;
mod moead;
pub mod multi_objective;
mod nsga2;
pub mod operators;
mod runner;
mod scalar;
mod selection;
mod types;

pub use archive::EpsilonBoxArchive;
pub use config::SearchConfig;
pub use operators::{Crossover, Mutation};
pub use runner::{Algorithm, SearchResult, SearchRunner};
pub use scalar::Aggregation;
pub use selection::{dominance_tournament, tournament, ShuffledPool};
pub use types::{MoProblem, Solution};
