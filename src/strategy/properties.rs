//! Typed lookup over string key/value properties.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// String properties configuring a strategy.
///
/// Getters return `Ok(None)` for absent keys and
/// [`ConfigError::InvalidProperty`] for values that do not parse.
///
/// # Examples
///
/// ```
/// use u_vrptw::strategy::Properties;
///
/// let props = Properties::new()
///     .with("delta", "0.8")
///     .with("epsilon", "0.5, 10, 10");
/// assert_eq!(props.get_f64("delta").unwrap(), Some(0.8));
/// assert_eq!(props.get_f64_array("epsilon").unwrap(), Some(vec![0.5, 10.0, 10.0]));
/// assert_eq!(props.get_f64("eta").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Creates an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a property, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw value, trimmed.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.trim())
    }

    /// Floating-point value.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        self.parse(key)
    }

    /// Non-negative integer value; fractional text is rejected.
    pub fn get_usize(&self, key: &str) -> Result<Option<usize>, ConfigError> {
        self.parse(key)
    }

    /// Boolean value; accepts `true`/`false` in any case.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.get_str(key) {
            None => Ok(None),
            Some(raw) if raw.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(raw) if raw.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(raw) => Err(invalid(key, raw)),
        }
    }

    /// Comma-separated numbers, optionally wrapped in brackets.
    pub fn get_f64_array(&self, key: &str) -> Result<Option<Vec<f64>>, ConfigError> {
        let Some(raw) = self.get_str(key) else {
            return Ok(None);
        };
        let inner = raw.trim_start_matches('[').trim_end_matches(']');
        let values: Result<Vec<f64>, _> = inner
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(f64::from_str)
            .collect();
        match values {
            Ok(values) if !values.is_empty() => Ok(Some(values)),
            _ => Err(invalid(key, raw)),
        }
    }

    fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.get_str(key) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| invalid(key, raw)),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn invalid(key: &str, raw: &str) -> ConfigError {
    ConfigError::InvalidProperty {
        key: key.to_string(),
        value: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let props: Properties = [
            ("rate", " 0.25 "),
            ("size", "12"),
            ("flag", "TRUE"),
            ("list", "[1, 2.5,3]"),
        ]
        .into_iter()
        .collect();

        assert_eq!(props.get_f64("rate").unwrap(), Some(0.25));
        assert_eq!(props.get_usize("size").unwrap(), Some(12));
        assert_eq!(props.get_bool("flag").unwrap(), Some(true));
        assert_eq!(props.get_f64_array("list").unwrap(), Some(vec![1.0, 2.5, 3.0]));
        assert_eq!(props.get_str("size"), Some("12"));
        assert!(props.contains("rate"));
        assert!(!props.contains("missing"));
    }

    #[test]
    fn test_absent_keys() {
        let props = Properties::new();
        assert_eq!(props.get_f64("x").unwrap(), None);
        assert_eq!(props.get_bool("x").unwrap(), None);
        assert_eq!(props.get_f64_array("x").unwrap(), None);
        assert_eq!(props.get_str("x"), None);
    }

    #[test]
    fn test_invalid_values() {
        let props = Properties::new()
            .with("size", "-3")
            .with("flag", "yes")
            .with("list", "1,,x")
            .with("empty", "[]");

        assert_eq!(
            props.get_usize("size"),
            Err(ConfigError::InvalidProperty {
                key: "size".into(),
                value: "-3".into()
            })
        );
        assert!(props.get_bool("flag").is_err());
        assert!(props.get_f64_array("list").is_err());
        assert!(props.get_f64_array("empty").is_err());
    }

    #[test]
    fn test_insert_overwrites() {
        let mut props = Properties::new().with("delta", "0.9");
        assert_eq!(props.insert("delta", "0.5"), Some("0.9".to_string()));
        assert_eq!(props.get_f64("delta").unwrap(), Some(0.5));
    }
}
