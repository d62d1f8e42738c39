//! Store identifiers and their normalisation.

use super::StoreDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix removed from catalogue identifiers when deriving store keys.
pub const SERVER_SUFFIX: &str = "-server";

/// Removes a trailing [`SERVER_SUFFIX`] unless nothing would remain.
#[must_use]
pub fn strip_server_suffix(id: &str) -> &str {
    id.strip_suffix(SERVER_SUFFIX)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(id)
}

/// Key of one entry in the configuration store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoreId(String);

impl StoreId {
    /// Creates a validated store identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreDomainError::EmptyStoreId`] when the trimmed value is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, StoreDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StoreDomainError::EmptyStoreId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wraps a key exactly as it appears in the store.
    ///
    /// No trimming or validation is applied, so keys this crate would never
    /// write (blank, padded) survive a read-modify-write cycle unchanged.
    #[must_use]
    pub fn from_store_key(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns whether this key and `other` are equal once surrounding
    /// whitespace is ignored.
    #[must_use]
    pub fn matches_trimmed(&self, other: &Self) -> bool {
        self.0.trim() == other.0.trim()
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier with any `-server` suffix removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self(strip_server_suffix(&self.0).to_owned())
    }

    /// Returns the identifier with a `-server` suffix appended.
    #[must_use]
    pub fn with_server_suffix(&self) -> Self {
        Self(format!("{}{SERVER_SUFFIX}", self.0))
    }

    /// Returns the lookup order used by removal: exact, stripped, suffixed.
    ///
    /// Duplicates are dropped.
    #[must_use]
    pub fn removal_candidates(&self) -> Vec<Self> {
        let mut candidates = vec![self.clone()];
        for candidate in [self.normalized(), self.with_server_suffix()] {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        candidates
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for StoreId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StoreId {
    type Error = StoreDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StoreId> for String {
    fn from(value: StoreId) -> Self {
        value.0
    }
}
