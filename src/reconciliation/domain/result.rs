//! Reconciliation output.

use super::{MatchPredicate, ShadowEntry};
use crate::catalog::domain::CatalogId;

/// Installed status of one catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStatus {
    catalog_id: CatalogId,
    matched_store_id: Option<String>,
    matched_by: Option<MatchPredicate>,
}

impl EntryStatus {
    /// Creates a status record from the winning store id and predicate.
    #[must_use]
    pub fn new(catalog_id: CatalogId, matched: Option<(String, MatchPredicate)>) -> Self {
        let (matched_store_id, matched_by) = matched.unzip();
        Self {
            catalog_id,
            matched_store_id,
            matched_by,
        }
    }

    /// Returns the catalogue identifier.
    #[must_use]
    pub const fn catalog_id(&self) -> &CatalogId {
        &self.catalog_id
    }

    /// Returns the store identifier that matched, if any.
    #[must_use]
    pub fn matched_store_id(&self) -> Option<&str> {
        self.matched_store_id.as_deref()
    }

    /// Returns the predicate that produced the match, if any.
    #[must_use]
    pub const fn matched_by(&self) -> Option<MatchPredicate> {
        self.matched_by
    }

    /// Returns the matched store id when the match identifies the entry.
    #[must_use]
    pub fn identifying_store_id(&self) -> Option<&str> {
        self.matched_by
            .filter(|predicate| predicate.identifies_entry())
            .and(self.matched_store_id())
    }

    /// Returns whether a store entry matched.
    #[must_use]
    pub const fn installed(&self) -> bool {
        self.matched_store_id.is_some()
    }
}

/// Derived cross-reference of a catalogue with the configuration store.
///
/// Recomputed from scratch on every call; never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    statuses: Vec<EntryStatus>,
    shadows: Vec<ShadowEntry>,
}

impl ReconciliationResult {
    /// Creates a result from its parts.
    #[must_use]
    pub const fn new(statuses: Vec<EntryStatus>, shadows: Vec<ShadowEntry>) -> Self {
        Self { statuses, shadows }
    }

    /// Returns one status per catalogue entry, in catalogue order.
    #[must_use]
    pub fn statuses(&self) -> &[EntryStatus] {
        &self.statuses
    }

    /// Returns shadow entries in store order.
    #[must_use]
    pub fn shadows(&self) -> &[ShadowEntry] {
        &self.shadows
    }

    /// Returns the status of `catalog_id`.
    #[must_use]
    pub fn status(&self, catalog_id: &CatalogId) -> Option<&EntryStatus> {
        self.statuses
            .iter()
            .find(|status| status.catalog_id() == catalog_id)
    }

    /// Returns whether `catalog_id` is configured.
    ///
    /// Shadow identities count as configured.
    #[must_use]
    pub fn is_installed(&self, catalog_id: &CatalogId) -> bool {
        self.status(catalog_id).map_or_else(
            || {
                self.shadows
                    .iter()
                    .any(|shadow| shadow.store_id() == catalog_id.as_str())
            },
            EntryStatus::installed,
        )
    }

    /// Returns the identifiers of installed catalogue entries.
    pub fn installed_ids(&self) -> impl Iterator<Item = &CatalogId> {
        self.statuses
            .iter()
            .filter(|status| status.installed())
            .map(EntryStatus::catalog_id)
    }
}
