use std::collections::HashMap;
use std::env::{self, VarError};

use thiserror::Error;

use crate::api::BoxError;

/// Error for when an environment variable cannot be looked up.
#[derive(Debug, Error)]
#[error("cannot read environment variable {key}: {source}")]
pub struct EnvError {
    key: String,
    source: BoxError,
}

impl EnvError {
    /// Create a lookup error for the key.
    pub fn new(key: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            key: key.into(),
            source: source.into(),
        }
    }

    /// The key being looked up.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// The source of environment variables, consulted for fields tagged `env`.
///
/// Closures of the form `Fn(&str) -> Result<Option<String>, EnvError>` are environments too.
pub trait Environment {
    /// The value of the variable, or `None` when it is absent.
    fn lookup(&self, key: &str) -> Result<Option<String>, EnvError>;
}

/// The process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn lookup(&self, key: &str) -> Result<Option<String>, EnvError> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(error @ VarError::NotUnicode(_)) => Err(EnvError::new(key, error)),
        }
    }
}

/// A fixed environment, usually for tests.
/// ```
/// # use argot_builder::*;
/// let environment = MapEnvironment::from([("PORT", "8080")]);
/// assert_eq!(environment.lookup("PORT").unwrap(), Some("8080".to_string()));
/// assert_eq!(environment.lookup("HOST").unwrap(), None);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnvironment {
    values: HashMap<String, String>,
}

impl MapEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for MapEnvironment {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Environment for MapEnvironment {
    fn lookup(&self, key: &str) -> Result<Option<String>, EnvError> {
        Ok(self.values.get(key).cloned())
    }
}

impl<F> Environment for F
where
    F: Fn(&str) -> Result<Option<String>, EnvError>,
{
    fn lookup(&self, key: &str) -> Result<Option<String>, EnvError> {
        self(key)
    }
}
