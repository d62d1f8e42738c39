//! Idempotent add and remove operations against the configuration store.

use crate::launch::domain::LaunchConfiguration;
use crate::store::{
    domain::{StoreId, StoreRevision, StoreSnapshot},
    ports::{ConfigurationStore, ConfigurationStoreError},
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Pause between a write and its read-back verification.
pub const DEFAULT_VERIFICATION_DELAY: Duration = Duration::from_millis(250);

/// Compare-and-swap attempts made before giving up on a contended store.
pub const DEFAULT_MAX_WRITE_ATTEMPTS: usize = 3;

/// Removed identifiers remembered for idempotent repeat removals.
pub const DEFAULT_REMOVAL_MEMORY: usize = 256;

/// Result type for configuration mutations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors returned by [`ConfigurationMutator`].
#[derive(Debug, Clone, Error)]
pub enum MutationError {
    /// An entry already exists under the identifier or its normalised form.
    #[error("server {0} is already configured")]
    AlreadyConfigured(StoreId),

    /// No entry exists under any removal candidate of the identifier.
    #[error("server {0} is not configured")]
    NotConfigured(StoreId),

    /// The write was accepted but the entry was absent on read-back.
    ///
    /// The store is left as read back; nothing is rolled back.
    #[error("write of server {store_id} was not observed on read-back (store at {observed})")]
    VerificationFailed {
        /// Identifier that was written.
        store_id: StoreId,
        /// Revision observed on read-back.
        observed: StoreRevision,
    },

    /// Every compare-and-swap attempt lost to a concurrent editor.
    #[error("configuration store kept changing while updating {store_id} ({attempts} attempts)")]
    StoreConflict {
        /// Identifier being written.
        store_id: StoreId,
        /// Attempts made.
        attempts: usize,
    },

    /// The store itself failed.
    #[error(transparent)]
    Store(#[from] ConfigurationStoreError),
}

/// Outcome of a successful [`ConfigurationMutator::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The entry under this identifier was deleted.
    Removed(StoreId),
    /// A previous call already removed the entry.
    AlreadyRemoved(StoreId),
}

type Gate = Arc<tokio::sync::Mutex<()>>;

/// The only writer of the configuration store.
///
/// Calls for the same normalised identifier run one at a time; a second
/// caller waits and then sees the store as the first left it.
///
/// Removed identifiers are remembered for the life of the mutator so a
/// repeat removal reports [`RemovalOutcome::AlreadyRemoved`]. Only the most
/// recent [`DEFAULT_REMOVAL_MEMORY`] are kept; older ones report
/// [`MutationError::NotConfigured`] again.
pub struct ConfigurationMutator<S>
where
    S: ConfigurationStore + ?Sized,
{
    store: Arc<S>,
    verification_delay: Duration,
    max_attempts: usize,
    in_flight: Mutex<HashMap<StoreId, Gate>>,
    removed: Mutex<VecDeque<StoreId>>,
    removal_memory: usize,
}

impl<S> ConfigurationMutator<S>
where
    S: ConfigurationStore + ?Sized,
{
    /// Creates a mutator with the default verification delay.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            verification_delay: DEFAULT_VERIFICATION_DELAY,
            max_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
            in_flight: Mutex::new(HashMap::new()),
            removed: Mutex::new(VecDeque::new()),
            removal_memory: DEFAULT_REMOVAL_MEMORY,
        }
    }

    /// Sets the pause before read-back verification.
    #[must_use]
    pub const fn with_verification_delay(mut self, delay: Duration) -> Self {
        self.verification_delay = delay;
        self
    }

    /// Sets the number of compare-and-swap attempts. Values below one are
    /// treated as one.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets how many removed identifiers are remembered. Values below one
    /// are treated as one.
    #[must_use]
    pub fn with_removal_memory(mut self, capacity: usize) -> Self {
        self.removal_memory = capacity.max(1);
        self
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Writes `config` under the normalised form of `store_id` and verifies
    /// it landed.
    ///
    /// Returns the identifier actually written.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::AlreadyConfigured`] when an entry exists
    /// under `store_id` or its normalised form,
    /// [`MutationError::VerificationFailed`] when read-back misses the entry,
    /// and [`MutationError::StoreConflict`] or [`MutationError::Store`] when
    /// the store cannot be written.
    pub async fn add(
        &self,
        store_id: &StoreId,
        config: &LaunchConfiguration,
    ) -> MutationResult<StoreId> {
        let key = store_id.normalized();
        self.serialized(&key, async {
            let value = config.to_store_value();
            self.write_with_retries(&key, |snapshot| {
                if let Some(existing) = [store_id, &key]
                    .into_iter()
                    .find_map(|candidate| snapshot.key_for(candidate))
                {
                    return Err(MutationError::AlreadyConfigured(existing.clone()));
                }
                let mut entries = snapshot.entries().to_vec();
                entries.push((key.clone(), value.clone()));
                Ok(Some(entries))
            })
            .await?;
            self.forget_removed(&key);

            tokio::time::sleep(self.verification_delay).await;
            let observed = self.store.snapshot().await?;
            if !observed.contains(&key) {
                warn!(
                    store_id = %key,
                    revision = %observed.revision(),
                    "written server missing on read-back; leaving store as observed"
                );
                return Err(MutationError::VerificationFailed {
                    store_id: key.clone(),
                    observed: observed.revision().clone(),
                });
            }

            info!(store_id = %key, command = config.command(), "server configured");
            Ok(key.clone())
        })
        .await
    }

    /// Removes the entry for `store_id`.
    ///
    /// Candidates are tried in order: exact, `-server` stripped, `-server`
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotConfigured`] when no candidate exists and
    /// this mutator never removed it, and [`MutationError::StoreConflict`] or
    /// [`MutationError::Store`] when the store cannot be written.
    pub async fn remove(&self, store_id: &StoreId) -> MutationResult<RemovalOutcome> {
        let key = store_id.normalized();
        self.serialized(&key, async {
            let candidates = store_id.removal_candidates();
            let mut removed_id = None;
            self.write_with_retries(&key, |snapshot| {
                removed_id = candidates
                    .iter()
                    .find_map(|candidate| snapshot.key_for(candidate))
                    .cloned();
                Ok(removed_id.as_ref().map(|found| {
                    snapshot
                        .entries()
                        .iter()
                        .filter(|(id, _)| id != found)
                        .cloned()
                        .collect()
                }))
            })
            .await?;

            match removed_id {
                Some(found) => {
                    self.remember_removed(&key);
                    info!(store_id = %found, "server removed");
                    Ok(RemovalOutcome::Removed(found))
                }
                None if self.was_removed(&key) => {
                    debug!(store_id = %key, "server already removed");
                    Ok(RemovalOutcome::AlreadyRemoved(key.clone()))
                }
                None => Err(MutationError::NotConfigured(store_id.clone())),
            }
        })
        .await
    }

    /// Finds the stored entry for `store_id` using the removal candidates.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::Store`] when the store cannot be read.
    pub async fn find(&self, store_id: &StoreId) -> MutationResult<Option<(StoreId, Value)>> {
        let snapshot = self.store.snapshot().await?;
        Ok(store_id.removal_candidates().iter().find_map(|candidate| {
            let key = snapshot.key_for(candidate)?;
            snapshot.get(key).map(|value| (key.clone(), value.clone()))
        }))
    }

    /// Runs a read-modify-write cycle until it lands or attempts run out.
    ///
    /// `plan` returns the replacement entries, or `None` to write nothing.
    async fn write_with_retries<F>(&self, key: &StoreId, mut plan: F) -> MutationResult<()>
    where
        F: FnMut(&StoreSnapshot) -> MutationResult<Option<Vec<(StoreId, Value)>>>,
    {
        for attempt in 1..=self.max_attempts {
            let snapshot = self.store.snapshot().await?;
            let Some(entries) = plan(&snapshot)? else {
                return Ok(());
            };
            match self
                .store
                .compare_and_swap(snapshot.revision(), entries)
                .await
            {
                Ok(revision) => {
                    debug!(store_id = %key, %revision, attempt, "store written");
                    return Ok(());
                }
                Err(ConfigurationStoreError::Conflict { actual, .. }) => {
                    warn!(store_id = %key, revision = %actual, attempt, "store changed during write; retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(MutationError::StoreConflict {
            store_id: key.clone(),
            attempts: self.max_attempts,
        })
    }

    async fn serialized<F, T>(&self, key: &StoreId, operation: F) -> T
    where
        F: Future<Output = T>,
    {
        let gate = Arc::clone(self.lock_in_flight().entry(key.clone()).or_default());
        let outcome = {
            let _turn = gate.lock().await;
            operation.await
        };

        let mut in_flight = self.lock_in_flight();
        if Arc::strong_count(&gate) == 2 {
            in_flight.remove(key);
        }
        outcome
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<StoreId, Gate>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_removed(&self) -> MutexGuard<'_, VecDeque<StoreId>> {
        self.removed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remember_removed(&self, key: &StoreId) {
        let mut removed = self.lock_removed();
        removed.retain(|existing| existing != key);
        removed.push_back(key.clone());
        while removed.len() > self.removal_memory {
            removed.pop_front();
        }
    }

    fn forget_removed(&self, key: &StoreId) {
        self.lock_removed().retain(|existing| existing != key);
    }

    fn was_removed(&self, key: &StoreId) -> bool {
        self.lock_removed().contains(key)
    }
}
