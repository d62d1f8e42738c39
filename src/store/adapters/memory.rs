//! In-memory configuration store.

use crate::store::{
    domain::{StoreId, StoreRevision, StoreSnapshot},
    ports::{ConfigurationStore, ConfigurationStoreError, ConfigurationStoreResult},
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory configuration store.
///
/// Besides serving the engine, it lets tests act as an outside editor
/// ([`Self::insert_external`]) or as a store that acknowledges writes
/// without keeping them ([`Self::set_discard_writes`]).
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigurationStore {
    entries: Arc<RwLock<Vec<(StoreId, Value)>>>,
    discard_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryConfigurationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `entries` in order.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = (StoreId, Value)>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Inserts or replaces an entry, bypassing compare-and-swap.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationStoreError::Persistence`] when lock acquisition
    /// fails.
    pub fn insert_external(&self, id: StoreId, value: Value) -> ConfigurationStoreResult<()> {
        let mut entries = self.entries.write().map_err(|err| {
            ConfigurationStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if let Some(slot) = entries.iter_mut().find(|(existing, _)| *existing == id) {
            slot.1 = value;
        } else {
            entries.push((id, value));
        }
        Ok(())
    }

    /// Makes subsequent writes succeed without changing the entries.
    pub fn set_discard_writes(&self, discard: bool) {
        self.discard_writes.store(discard, Ordering::SeqCst);
    }

    /// Returns how many compare-and-swap writes were accepted.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    fn describe(&self) -> String {
        "in-memory".to_owned()
    }

    async fn snapshot(&self) -> ConfigurationStoreResult<StoreSnapshot> {
        let entries = self.entries.read().map_err(|err| {
            ConfigurationStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(StoreSnapshot::new(entries.clone()))
    }

    async fn compare_and_swap(
        &self,
        expected: &StoreRevision,
        replacement: Vec<(StoreId, Value)>,
    ) -> ConfigurationStoreResult<StoreRevision> {
        let mut entries = self.entries.write().map_err(|err| {
            ConfigurationStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let actual = StoreRevision::of(&entries);
        if actual != *expected {
            return Err(ConfigurationStoreError::Conflict {
                expected: expected.clone(),
                actual,
            });
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.discard_writes.load(Ordering::SeqCst) {
            return Ok(StoreRevision::of(&replacement));
        }
        *entries = replacement;
        Ok(StoreRevision::of(&entries))
    }
}
