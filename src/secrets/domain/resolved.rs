//! Environment values resolved for one install.

use super::is_sensitive;
use std::collections::BTreeMap;
use std::fmt;

/// Values gathered for a single install.
///
/// Sensitive values live only as long as this value; `Debug` output
/// redacts them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    values: BTreeMap<String, String>,
}

impl ResolvedEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns all values keyed by name.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Returns the values whose names are not sensitive.
    pub fn non_sensitive(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(name, _)| !is_sensitive(name))
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns whether nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, String>> for ResolvedEnvironment {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl fmt::Debug for ResolvedEnvironment {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.values.iter().map(|(name, value)| {
                let shown = if is_sensitive(name) { "<redacted>" } else { value.as_str() };
                (name, shown)
            }))
            .finish()
    }
}
