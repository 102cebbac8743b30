//! Named strategies and their resolution to engine algorithms.

use super::properties::Properties;
use crate::error::ConfigError;
use crate::moea::{Aggregation, Algorithm};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Neighbourhood fraction of the population used by MOEA/D when unset.
const DEFAULT_NEIGHBORHOOD_FRACTION: f64 = 0.1;

/// Default MOEA/D mating-restriction probability.
const DEFAULT_DELTA: f64 = 0.9;

/// Default MOEA/D replacement limit.
const DEFAULT_ETA: usize = 2;

/// A named search strategy with its user-facing parameters.
///
/// Parameters that depend on the population size (MOEA/D neighbourhood and
/// replacement limit) are kept as fractions and resolved by
/// [`resolve`](Self::resolve).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StrategyConfig {
    /// `"NSGA-II"`.
    NsgaII {
        /// Tournament parent selection when `true`, shuffled pairing
        /// otherwise.
        with_replacement: bool,
    },

    /// `"eMOEA"`.
    EpsilonMoea {
        /// ε per objective; derived from the instance when `None`.
        epsilon: Option<Vec<f64>>,
    },

    /// `"MOEA/D"`.
    MoeaD {
        /// Neighbourhood size as a fraction of the population.
        neighborhood_size: Option<f64>,
        /// Probability of mating inside the neighbourhood.
        delta: f64,
        /// Replacement limit as a fraction of the population.
        eta: Option<f64>,
        /// Utility update period in generations; `None` disables it.
        update_utility: Option<usize>,
    },

    /// `"GeneticAlgorithm"`.
    GeneticAlgorithm {
        /// Objective weights; the last weight repeats.
        weights: Vec<f64>,
        /// Weighting method.
        method: Aggregation,
    },
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::EpsilonMoea { epsilon: None }
    }
}

impl StrategyConfig {
    /// Builds a strategy from its name and properties.
    ///
    /// Names are matched case-insensitively; `"NSGAII"` and `"MOEAD"` are
    /// accepted as aliases.
    ///
    /// | Strategy | Keys |
    /// |----------|------|
    /// | NSGA-II | `withReplacement` (default `true`) |
    /// | eMOEA | `epsilon` (comma-separated) |
    /// | MOEA/D | `neighborhoodSize`, `delta` (0.9), `eta`, `updateUtility` (truncated; < 1 disables) |
    /// | GeneticAlgorithm | `weights` (`1.0`), `method` (`linear` or `min-max`) |
    ///
    /// # Errors
    /// [`ConfigError::UnknownStrategy`] for an unrecognized name,
    /// [`ConfigError::UnknownWeightingMethod`] for an unrecognized method,
    /// [`ConfigError::InvalidProperty`] for unparsable values.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_vrptw::strategy::{Properties, StrategyConfig};
    ///
    /// let props = Properties::new().with("delta", "0.7");
    /// let strategy = StrategyConfig::from_name("moea/d", &props).unwrap();
    /// assert_eq!(strategy.name(), "MOEA/D");
    ///
    /// assert!(StrategyConfig::from_name("SPEA2", &props).is_err());
    /// ```
    pub fn from_name(name: &str, props: &Properties) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "nsga-ii" | "nsgaii" => Ok(StrategyConfig::NsgaII {
                with_replacement: props.get_bool("withReplacement")?.unwrap_or(true),
            }),
            "emoea" => Ok(StrategyConfig::EpsilonMoea {
                epsilon: props.get_f64_array("epsilon")?,
            }),
            "moea/d" | "moead" => Ok(StrategyConfig::MoeaD {
                neighborhood_size: props.get_f64("neighborhoodSize")?,
                delta: props.get_f64("delta")?.unwrap_or(DEFAULT_DELTA),
                eta: props.get_f64("eta")?,
                update_utility: props
                    .get_f64("updateUtility")?
                    .map(f64::trunc)
                    .filter(|&freq| freq >= 1.0)
                    .map(|freq| freq as usize),
            }),
            "geneticalgorithm" | "ga" => Ok(StrategyConfig::GeneticAlgorithm {
                weights: props.get_f64_array("weights")?.unwrap_or_else(|| vec![1.0]),
                method: match props.get_str("method") {
                    Some(method) => method.parse()?,
                    None => Aggregation::default(),
                },
            }),
            _ => Err(ConfigError::UnknownStrategy(name.to_string())),
        }
    }

    /// Canonical strategy name.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyConfig::NsgaII { .. } => "NSGA-II",
            StrategyConfig::EpsilonMoea { .. } => "eMOEA",
            StrategyConfig::MoeaD { .. } => "MOEA/D",
            StrategyConfig::GeneticAlgorithm { .. } => "GeneticAlgorithm",
        }
    }

    /// Resolves the strategy against a concrete population size.
    ///
    /// Returns the engine algorithm and the population size to run with,
    /// which MOEA/D raises to at least `objective_count`.
    pub fn resolve(
        &self,
        population_size: usize,
        objective_count: usize,
        default_epsilon: &[f64],
    ) -> Result<(Algorithm, usize), ConfigError> {
        let resolved = match self {
            StrategyConfig::NsgaII { with_replacement } => (
                Algorithm::NsgaII {
                    with_replacement: *with_replacement,
                },
                population_size,
            ),
            StrategyConfig::EpsilonMoea { epsilon } => (
                Algorithm::EpsilonMoea {
                    epsilons: epsilon.clone().unwrap_or_else(|| default_epsilon.to_vec()),
                },
                population_size,
            ),
            StrategyConfig::MoeaD {
                neighborhood_size,
                delta,
                eta,
                update_utility,
            } => {
                let n = population_size.max(objective_count);
                if n > population_size {
                    log::warn!(
                        "MOEA/D population raised from {} to {} to cover {} objectives",
                        population_size,
                        n,
                        objective_count
                    );
                }
                let neighborhood = match neighborhood_size {
                    None => fraction_of(DEFAULT_NEIGHBORHOOD_FRACTION, n, f64::round),
                    Some(f) => fraction_of(positive("neighborhoodSize", *f)?, n, f64::floor),
                };
                let eta = match eta {
                    None => DEFAULT_ETA,
                    Some(f) => fraction_of(positive("eta", *f)?, n, f64::floor),
                };
                (
                    Algorithm::Decomposition {
                        neighborhood_size: neighborhood.min(n),
                        delta: *delta,
                        eta,
                        update_utility: *update_utility,
                    },
                    n,
                )
            }
            StrategyConfig::GeneticAlgorithm { weights, method } => (
                Algorithm::WeightedScalar {
                    weights: weights.clone(),
                    aggregation: *method,
                },
                population_size,
            ),
        };
        resolved.0.validate()?;
        Ok(resolved)
    }
}

/// `max(2, round_fn(fraction * n))`.
fn fraction_of(fraction: f64, n: usize, round_fn: fn(f64) -> f64) -> usize {
    (round_fn(fraction * n as f64) as usize).max(2)
}

fn positive(key: &str, value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidProperty {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl FromStr for StrategyConfig {
    type Err = ConfigError;

    /// Parses a strategy name with default parameters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s, &Properties::new())
    }
}

impl fmt::Display for StrategyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
