//! Structural validation of the live configuration store.

use crate::store::{
    domain::{ValidationReport, validate_snapshot},
    ports::{ConfigurationStore, ConfigurationStoreResult},
};
use std::sync::Arc;
use tracing::warn;

/// Checks store entries for required fields independently of the catalogue.
pub struct ConfigurationValidator<S>
where
    S: ConfigurationStore + ?Sized,
{
    store: Arc<S>,
}

impl<S> ConfigurationValidator<S>
where
    S: ConfigurationStore + ?Sized,
{
    /// Creates a validator reading from `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validates the current store contents.
    ///
    /// # Errors
    ///
    /// Returns the store error when the store cannot be read.
    pub async fn validate(&self) -> ConfigurationStoreResult<ValidationReport> {
        let snapshot = self.store.snapshot().await?;
        let report = validate_snapshot(&snapshot);
        if !report.is_valid {
            warn!(
                store = %self.store.describe(),
                errors = report.errors.len(),
                "configuration store has invalid entries"
            );
        }
        Ok(report)
    }
}
