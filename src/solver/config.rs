//! Driver configuration and escalation schedule.

use crate::error::ConfigError;
use crate::moea::{Crossover, Mutation, SearchConfig};
use crate::strategy::{Properties, StrategyConfig, Variation};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration of the adaptive driver.
///
/// Round `r` (0-based) runs with `max_evaluations × evaluation_growthʳ`
/// evaluations and `population_size + r × population_step` individuals.
///
/// # Defaults
///
/// ```
/// use u_vrptw::solver::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.max_evaluations, 1000);
/// assert_eq!(config.population_size, 200);
/// assert_eq!(config.max_rounds, 3);
/// assert_eq!(config.strategy.name(), "eMOEA");
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_vrptw::solver::SolverConfig;
///
/// let config = SolverConfig::service()
///     .with_strategy("NSGA-II".parse().unwrap())
///     .with_seed(7);
/// assert_eq!(config.round_search(1).max_evaluations, 5000);
/// assert_eq!(config.round_search(1).population_size, 250);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Search strategy.
    pub strategy: StrategyConfig,

    /// Evaluation budget of the first round.
    pub max_evaluations: usize,

    /// Population size of the first round.
    pub population_size: usize,

    /// Maximum number of rounds, the first one included.
    pub max_rounds: usize,

    /// Factor applied to the evaluation budget on each escalation.
    pub evaluation_growth: usize,

    /// Individuals added to the population on each escalation.
    pub population_step: usize,

    /// Crossover operator.
    pub crossover: Crossover,

    /// Probability of recombining a pair of parents (0.0–1.0).
    pub crossover_rate: f64,

    /// Mutation operator.
    pub mutation: Mutation,

    /// Probability of mutating an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Whether offspring are evaluated in parallel.
    pub parallel: bool,

    /// Random seed; round `r` runs with `seed + r`. `None` draws a random
    /// seed per round.
    pub seed: Option<u64>,

    /// Optional wall-clock limit per round in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            strategy: StrategyConfig::default(),
            max_evaluations: 1000,
            population_size: 200,
            max_rounds: 3,
            evaluation_growth: 2,
            population_step: 50,
            crossover: Crossover::default(),
            crossover_rate: search.crossover_rate,
            mutation: Mutation::default(),
            mutation_rate: search.mutation_rate,
            parallel: search.parallel,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl SolverConfig {
    /// Preset used by the routing service: 2500 evaluations and 200
    /// individuals in the first round.
    pub fn service() -> Self {
        Self {
            max_evaluations: 2500,
            ..Self::default()
        }
    }

    /// Builds a configuration from a strategy name and properties.
    ///
    /// Strategy keys, operator keys (`crossover`, `crossover.rate`,
    /// `mutation`, `mutation.rate`) and `populationSize` are read from the
    /// same property set.
    pub fn from_properties(strategy: &str, props: &Properties) -> Result<Self, ConfigError> {
        let mut config = Self::default()
            .with_strategy(StrategyConfig::from_name(strategy, props)?)
            .with_variation(Variation::from_properties(props)?);
        if let Some(n) = props.get_usize("populationSize")? {
            config = config.with_population_size(n);
        }
        Ok(config)
    }

    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the first-round evaluation budget.
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = n;
        self
    }

    /// Sets the first-round population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of rounds.
    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }

    /// Sets the escalation factors.
    pub fn with_escalation(mut self, evaluation_growth: usize, population_step: usize) -> Self {
        self.evaluation_growth = evaluation_growth;
        self.population_step = population_step;
        self
    }

    /// Applies operator choices and any rate overrides.
    pub fn with_variation(mut self, variation: Variation) -> Self {
        self.crossover = variation.crossover;
        self.mutation = variation.mutation;
        if let Some(rate) = variation.crossover_rate {
            self.crossover_rate = rate.clamp(0.0, 1.0);
        }
        if let Some(rate) = variation.mutation_rate {
            self.mutation_rate = rate.clamp(0.0, 1.0);
        }
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the per-round wall-clock limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Search configuration of round `round` (0-based), before strategy
    /// adjustments to the population size.
    pub fn round_search(&self, round: usize) -> SearchConfig {
        let growth = (0..round).fold(1usize, |acc, _| acc.saturating_mul(self.evaluation_growth));
        let mut search = SearchConfig::default()
            .with_max_evaluations(self.max_evaluations.saturating_mul(growth))
            .with_population_size(
                self.population_size
                    .saturating_add(self.population_step.saturating_mul(round)),
            )
            .with_crossover_rate(self.crossover_rate)
            .with_mutation_rate(self.mutation_rate)
            .with_parallel(self.parallel);
        if let Some(seed) = self.seed {
            search = search.with_seed(seed.wrapping_add(round as u64));
        }
        if let Some(ms) = self.time_limit_ms {
            search = search.with_time_limit_ms(ms);
        }
        search
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(ConfigError::OutOfRange("max_rounds must be at least 1"));
        }
        if self.evaluation_growth == 0 {
            return Err(ConfigError::OutOfRange("evaluation_growth must be at least 1"));
        }
        self.round_search(0).validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation_schedule() {
        let config = SolverConfig::default().with_seed(42);
        let rounds: Vec<(usize, usize, Option<u64>)> = (0..3)
            .map(|r| {
                let search = config.round_search(r);
                (search.max_evaluations, search.population_size, search.seed)
            })
            .collect();
        assert_eq!(
            rounds,
            vec![
                (1000, 200, Some(42)),
                (2000, 250, Some(43)),
                (4000, 300, Some(44)),
            ]
        );
    }

    #[test]
    fn test_service_preset() {
        let config = SolverConfig::service();
        assert_eq!(config.max_evaluations, 2500);
        assert_eq!(config.population_size, 200);
        assert_eq!(config.round_search(2).max_evaluations, 10_000);
    }

    #[test]
    fn test_unseeded_rounds_stay_unseeded() {
        let config = SolverConfig::default();
        assert_eq!(config.round_search(1).seed, None);
    }

    #[test]
    fn test_from_properties() {
        let props = Properties::new()
            .with("withReplacement", "false")
            .with("mutation", "insert")
            .with("mutation.rate", "0.1");
        let config = SolverConfig::from_properties("NSGA-II", &props).unwrap();
        assert_eq!(
            config.strategy,
            StrategyConfig::NsgaII {
                with_replacement: false
            }
        );
        assert_eq!(config.mutation, Mutation::Insert);
        assert_eq!(config.mutation_rate, 0.1);
        assert_eq!(config.round_search(0).mutation_rate, 0.1);
        assert_eq!(config.population_size, SolverConfig::default().population_size);

        assert_eq!(
            SolverConfig::from_properties("Random", &props),
            Err(ConfigError::UnknownStrategy("Random".into()))
        );
    }

    #[test]
    fn test_validate() {
        assert!(SolverConfig::default().validate().is_ok());
        assert!(SolverConfig::default().with_max_rounds(0).validate().is_err());
        assert!(SolverConfig::default().with_population_size(1).validate().is_err());
        assert!(SolverConfig::default().with_max_evaluations(0).validate().is_err());
        assert!(SolverConfig::default().with_escalation(0, 50).validate().is_err());
    }

    #[test]
    fn test_population_size_property() {
        let props = Properties::new().with("populationSize", "120");
        let config = SolverConfig::from_properties("eMOEA", &props).unwrap();
        assert_eq!(config.population_size, 120);
        assert_eq!(config.round_search(0).population_size, 120);

        let props = Properties::new().with("populationSize", "12.5");
        assert_eq!(
            SolverConfig::from_properties("eMOEA", &props),
            Err(ConfigError::InvalidProperty {
                key: "populationSize".into(),
                value: "12.5".into(),
            })
        );
    }

    #[test]
    fn test_rates_clamped() {
        let config = SolverConfig::default()
            .with_crossover_rate(1.5)
            .with_mutation_rate(-0.2);
        assert_eq!(config.crossover_rate, 1.0);
        assert_eq!(config.mutation_rate, 0.0);
    }
}
