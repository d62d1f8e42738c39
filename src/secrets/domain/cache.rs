//! Cache of previously entered non-sensitive values.

use super::is_sensitive;
use crate::catalog::domain::CatalogId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{catalogId: {envName: value}}`, holding non-sensitive values only.
///
/// Sensitive names are filtered on every way in, including
/// deserialisation, so a hand-edited cache file cannot leak them back out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, BTreeMap<String, String>>")]
#[serde(into = "BTreeMap<String, BTreeMap<String, String>>")]
pub struct SecretCache {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl SecretCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value of `name` for `catalog_id`.
    #[must_use]
    pub fn get(&self, catalog_id: &CatalogId, name: &str) -> Option<&str> {
        self.entries
            .get(catalog_id.as_str())
            .and_then(|values| values.get(name))
            .map(String::as_str)
    }

    /// Returns every cached value for `catalog_id`.
    #[must_use]
    pub fn values_for(&self, catalog_id: &CatalogId) -> Option<&BTreeMap<String, String>> {
        self.entries.get(catalog_id.as_str())
    }

    /// Merges `values` under `catalog_id`, overwriting equal names and
    /// dropping sensitive ones.
    pub fn merge<'a>(
        &mut self,
        catalog_id: &CatalogId,
        values: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        let mut accepted = values
            .into_iter()
            .filter(|(name, _)| !is_sensitive(name))
            .peekable();
        if accepted.peek().is_none() {
            return;
        }
        let slot = self
            .entries
            .entry(catalog_id.as_str().to_owned())
            .or_default();
        for (name, value) in accepted {
            slot.insert(name.to_owned(), value.to_owned());
        }
    }

    /// Returns whether the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, BTreeMap<String, String>>> for SecretCache {
    fn from(raw: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        let entries = raw
            .into_iter()
            .map(|(catalog_id, values)| {
                let kept: BTreeMap<String, String> = values
                    .into_iter()
                    .filter(|(name, _)| !is_sensitive(name))
                    .collect();
                (catalog_id, kept)
            })
            .filter(|(_, values)| !values.is_empty())
            .collect();
        Self { entries }
    }
}

impl From<SecretCache> for BTreeMap<String, BTreeMap<String, String>> {
    fn from(cache: SecretCache) -> Self {
        cache.entries
    }
}
