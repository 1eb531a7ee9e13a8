//! Environment variable helpers
//!
//! Reading goes through a lookup function so callers can substitute a fixed
//! map in tests instead of mutating the process environment.

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration variables
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// Variable is unset or blank
    #[error("{0} not set")]
    Missing(String),

    /// Variable is set but cannot be parsed
    #[error("{name} is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

/// Source of configuration variables
pub struct Vars<F> {
    lookup: F,
}

impl Vars<fn(&str) -> Option<String>> {
    /// Read from the process environment
    pub fn process() -> Self {
        Self {
            lookup: |name| std::env::var(name).ok(),
        }
    }
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Read through an arbitrary lookup function
    pub fn from_fn(lookup: F) -> Self {
        Self { lookup }
    }

    /// Value of `name`, treating blank values as unset
    pub fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, name: &str) -> Result<String, EnvError> {
        self.optional(name)
            .ok_or_else(|| EnvError::Missing(name.to_string()))
    }

    /// Parse `name` when present
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, EnvError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(name)
            .map(|raw| {
                raw.parse().map_err(|e: T::Err| EnvError::Invalid {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> Vars<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Vars::from_fn(move |name| map.get(name).cloned())
    }

    #[test]
    fn test_required_present() {
        let vars = vars(&[("TOKEN", " abc ")]);
        assert_eq!(vars.required("TOKEN").unwrap(), "abc");
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let vars = vars(&[("TOKEN", "   ")]);
        assert_eq!(
            vars.required("TOKEN"),
            Err(EnvError::Missing("TOKEN".to_string()))
        );
        assert_eq!(vars.optional("TOKEN"), None);
    }

    #[test]
    fn test_parse() {
        let vars = vars(&[("PORT", "8080"), ("BAD", "eighty")]);
        assert_eq!(vars.parse::<u16>("PORT").unwrap(), Some(8080));
        assert_eq!(vars.parse::<u16>("UNSET").unwrap(), None);

        let err = vars.parse::<u16>("BAD").unwrap_err();
        assert!(matches!(err, EnvError::Invalid { ref name, .. } if name == "BAD"));
        assert!(err.to_string().starts_with("BAD is invalid"));
    }
}
