//! Variation operator settings read from properties.

use super::properties::Properties;
use crate::error::ConfigError;
use crate::moea::{Crossover, Mutation};

/// Crossover and mutation choice with optional rate overrides.
///
/// | Key | Values |
/// |-----|--------|
/// | `crossover` | `ox` (default), `pmx` |
/// | `crossover.rate` | 0.0–1.0 |
/// | `mutation` | `swap` (default), `insert`, `invert` |
/// | `mutation.rate` | 0.0–1.0 |
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Variation {
    /// Permutation crossover operator.
    pub crossover: Crossover,
    /// Crossover probability; `None` keeps the strategy default.
    pub crossover_rate: Option<f64>,
    /// Permutation mutation operator.
    pub mutation: Mutation,
    /// Mutation probability; `None` keeps the strategy default.
    pub mutation_rate: Option<f64>,
}

impl Variation {
    /// Reads operator keys; absent keys keep their defaults.
    pub fn from_properties(props: &Properties) -> Result<Self, ConfigError> {
        let crossover = match props.get_str("crossover") {
            Some(name) => name.parse()?,
            None => Crossover::default(),
        };
        let mutation = match props.get_str("mutation") {
            Some(name) => name.parse()?,
            None => Mutation::default(),
        };
        Ok(Self {
            crossover,
            crossover_rate: rate(props, "crossover.rate")?,
            mutation,
            mutation_rate: rate(props, "mutation.rate")?,
        })
    }
}

fn rate(props: &Properties, key: &str) -> Result<Option<f64>, ConfigError> {
    match props.get_f64(key)? {
        Some(r) if !(0.0..=1.0).contains(&r) => Err(ConfigError::InvalidProperty {
            key: key.to_string(),
            value: r.to_string(),
        }),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Variation::from_properties(&Properties::new()).unwrap(), Variation::default());
    }

    #[test]
    fn test_overrides() {
        let props = Properties::new()
            .with("crossover", "PMX")
            .with("crossover.rate", "0.8")
            .with("mutation", "inversion")
            .with("mutation.rate", "0.05");
        let variation = Variation::from_properties(&props).unwrap();
        assert_eq!(variation.crossover, Crossover::PartiallyMapped);
        assert_eq!(variation.crossover_rate, Some(0.8));
        assert_eq!(variation.mutation, Mutation::Invert);
        assert_eq!(variation.mutation_rate, Some(0.05));
    }

    #[test]
    fn test_rejections() {
        let props = Properties::new().with("crossover", "cycle");
        assert_eq!(
            Variation::from_properties(&props),
            Err(ConfigError::UnknownOperator {
                kind: "crossover",
                name: "cycle".into()
            })
        );
        let props = Properties::new().with("mutation.rate", "1.2");
        assert!(Variation::from_properties(&props).is_err());
    }
}
