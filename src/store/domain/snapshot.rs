//! Point-in-time view of the configuration store.

use super::StoreId;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content revision of a store snapshot.
///
/// Two snapshots with equal entries in equal order have equal revisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreRevision(String);

impl StoreRevision {
    /// Computes the revision of `entries`.
    #[must_use]
    pub fn of(entries: &[(StoreId, Value)]) -> Self {
        let document = Value::Object(to_map(entries)).to_string();
        Self(format!("{:x}", Sha256::digest(document.as_bytes())))
    }

    /// Returns the hexadecimal digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreRevision {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Ordered entries of the store plus their revision.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    entries: Vec<(StoreId, Value)>,
    revision: StoreRevision,
}

impl StoreSnapshot {
    /// Creates a snapshot from entries in store order.
    #[must_use]
    pub fn new(entries: Vec<(StoreId, Value)>) -> Self {
        let revision = StoreRevision::of(&entries);
        Self { entries, revision }
    }

    /// Creates a snapshot from a JSON object.
    ///
    /// Keys are kept verbatim, blank and padded ones included.
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self::new(
            map.into_iter()
                .map(|(key, value)| (StoreId::from_store_key(key), value))
                .collect(),
        )
    }

    /// Returns the entries in store order.
    #[must_use]
    pub fn entries(&self) -> &[(StoreId, Value)] {
        &self.entries
    }

    /// Consumes the snapshot, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<(StoreId, Value)> {
        self.entries
    }

    /// Returns the revision.
    #[must_use]
    pub const fn revision(&self) -> &StoreRevision {
        &self.revision
    }

    /// Returns the store identifiers in store order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(id, _)| id.as_str().to_owned())
            .collect()
    }

    /// Returns the entry stored under exactly `id`.
    #[must_use]
    pub fn get(&self, id: &StoreId) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == id)
            .map(|(_, value)| value)
    }

    /// Returns the stored key for `id`.
    ///
    /// An exact key wins; otherwise the first key equal to `id` once
    /// whitespace is trimmed.
    #[must_use]
    pub fn key_for(&self, id: &StoreId) -> Option<&StoreId> {
        self.entries
            .iter()
            .map(|(key, _)| key)
            .find(|key| *key == id)
            .or_else(|| {
                self.entries
                    .iter()
                    .map(|(key, _)| key)
                    .find(|key| key.matches_trimmed(id))
            })
    }

    /// Returns whether an entry is stored under exactly `id`.
    #[must_use]
    pub fn contains(&self, id: &StoreId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries as a JSON object.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        to_map(&self.entries)
    }
}

fn to_map(entries: &[(StoreId, Value)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(id, value)| (id.as_str().to_owned(), value.clone()))
        .collect()
}
