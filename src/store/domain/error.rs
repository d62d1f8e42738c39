//! Domain errors for the configuration store.

use thiserror::Error;

/// Invariant violations in store domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreDomainError {
    /// A store identifier was empty after trimming.
    #[error("store identifier must not be empty")]
    EmptyStoreId,
}
