//! Search configuration.
//!
//! [`SearchConfig`] holds the parameters shared by every algorithm: budget,
//! variation rates, parallelism, and reproducibility.

use crate::error::ConfigError;

/// Configuration shared by every search algorithm.
///
/// # Defaults
///
/// ```
/// use u_vrptw::moea::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_evaluations, 10_000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_vrptw::moea::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_population_size(200)
///     .with_max_evaluations(2_500)
///     .with_mutation_rate(0.1)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Number of individuals in the working population.
    pub population_size: usize,

    /// Evaluation budget, including the initial population.
    pub max_evaluations: usize,

    /// Probability of recombining a pair of parents (0.0–1.0).
    ///
    /// When crossover is skipped, a clone of the first parent is used.
    pub crossover_rate: f64,

    /// Probability of mutating an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Offspring produced between two evaluation barriers by steady-state
    /// algorithms (ε-MOEA).
    pub offspring_batch: usize,

    /// Whether to evaluate offspring in parallel.
    ///
    /// Has no effect without the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock limit in milliseconds.
    ///
    /// Checked between generations, so a run may overshoot by one
    /// generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_evaluations: 10_000,
            crossover_rate: 1.0,
            mutation_rate: 0.3,
            offspring_batch: 16,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl SearchConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the evaluation budget.
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = n;
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

    /// Sets the steady-state offspring batch.
    pub fn with_offspring_batch(mut self, n: usize) -> Self {
        self.offspring_batch = n;
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

    /// Sets the wall-clock limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::OutOfRange("population_size must be at least 2"));
        }
        if self.max_evaluations == 0 {
            return Err(ConfigError::OutOfRange("max_evaluations must be at least 1"));
        }
        if self.offspring_batch == 0 {
            return Err(ConfigError::OutOfRange("offspring_batch must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) || !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::OutOfRange("variation rates must lie in [0, 1]"));
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::OutOfRange("time_limit_ms must be positive or None"));
        }
        Ok(())
    }
}
