//! Persistence port for the configuration store.

use crate::store::domain::{StoreId, StoreRevision, StoreSnapshot};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for configuration store operations.
pub type ConfigurationStoreResult<T> = Result<T, ConfigurationStoreError>;

/// Access to the externally owned key to launch-configuration map.
///
/// Implementations must make [`Self::compare_and_swap`] atomic with respect
/// to other callers of the same implementation. Editors outside the process
/// are detected on a best-effort basis only.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Short human-readable description used in logs.
    fn describe(&self) -> String;

    /// Reads the current entries.
    async fn snapshot(&self) -> ConfigurationStoreResult<StoreSnapshot>;

    /// Replaces all entries if the store is still at `expected`.
    ///
    /// Returns the new revision.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationStoreError::Conflict`] when the store moved on
    /// since `expected` was read.
    async fn compare_and_swap(
        &self,
        expected: &StoreRevision,
        entries: Vec<(StoreId, Value)>,
    ) -> ConfigurationStoreResult<StoreRevision>;
}

/// Errors returned by configuration store implementations.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationStoreError {
    /// The store changed between read and write.
    #[error("configuration store changed concurrently (expected {expected}, found {actual})")]
    Conflict {
        /// Revision the caller read.
        expected: StoreRevision,
        /// Revision found at write time.
        actual: StoreRevision,
    },

    /// The settings document does not have the expected shape.
    #[error("invalid settings document: {0}")]
    InvalidDocument(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConfigurationStoreError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
