//! Pure reconciliation of catalogue entries with store identifiers.

use crate::catalog::domain::CatalogEntry;
use crate::reconciliation::domain::{
    DEFAULT_PREDICATES, EntryStatus, MatchPredicate, ReconciliationResult, ShadowEntry,
};
use std::collections::HashSet;

/// Cross-references catalogue entries with configured store identifiers.
///
/// Holds only the predicate table, so one engine can be shared freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationEngine {
    predicates: Vec<MatchPredicate>,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self {
            predicates: DEFAULT_PREDICATES.to_vec(),
        }
    }
}

impl ReconciliationEngine {
    /// Replaces the predicate table. Order is precedence.
    #[must_use]
    pub fn with_predicates(mut self, predicates: impl IntoIterator<Item = MatchPredicate>) -> Self {
        self.predicates = predicates.into_iter().collect();
        self
    }

    /// Returns the predicate table.
    #[must_use]
    pub fn predicates(&self) -> &[MatchPredicate] {
        &self.predicates
    }

    /// Reconciles `entries` with `store_ids`.
    ///
    /// `store_ids` must be in the store's iteration order. For each entry
    /// the first predicate with any match wins, and within a predicate the
    /// first store id in order wins.
    #[must_use]
    pub fn reconcile(&self, entries: &[CatalogEntry], store_ids: &[String]) -> ReconciliationResult {
        let statuses = entries
            .iter()
            .map(|entry| EntryStatus::new(entry.id().clone(), self.best_match(entry, store_ids)))
            .collect();

        let mut seen = HashSet::new();
        let shadows = store_ids
            .iter()
            .map(String::as_str)
            .filter(|store_id| seen.insert(*store_id))
            .filter(|store_id| !self.is_claimed(entries, store_id))
            .filter_map(ShadowEntry::for_store_id)
            .collect();

        ReconciliationResult::new(statuses, shadows)
    }

    fn best_match(
        &self,
        entry: &CatalogEntry,
        store_ids: &[String],
    ) -> Option<(String, MatchPredicate)> {
        self.predicates.iter().find_map(|predicate| {
            store_ids
                .iter()
                .find(|store_id| predicate.matches(entry, store_id))
                .map(|store_id| (store_id.clone(), *predicate))
        })
    }

    fn is_claimed(&self, entries: &[CatalogEntry], store_id: &str) -> bool {
        entries.iter().any(|entry| {
            self.predicates
                .iter()
                .any(|predicate| predicate.matches(entry, store_id))
        })
    }
}
