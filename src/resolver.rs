// Author: Dustin Pilgrim
// License: MIT

use std::env;

use indexmap::IndexMap;

/// Source of values for `env(NAME)` references.
///
/// Lookups never fail: an unset variable reads as the empty string.
pub trait EnvSource {
    fn lookup(&self, name: &str) -> String;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, name: &str) -> String {
        env::var(name).unwrap_or_default()
    }
}

/// A fixed set of variables, for tests and embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv(pub IndexMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl EnvSource for MapEnv {
    fn lookup(&self, name: &str) -> String {
        self.0.get(name).cloned().unwrap_or_default()
    }
}
