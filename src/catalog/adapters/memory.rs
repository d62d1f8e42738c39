//! In-memory catalogue source for tests and embedded catalogues.

use crate::catalog::{
    domain::CatalogDocument,
    ports::{CatalogSource, CatalogSourceError, CatalogSourceResult},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory catalogue source.
///
/// The held document can be swapped or replaced by a failure at any time,
/// which lets tests exercise refresh and fallback behaviour.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogSource {
    state: Arc<RwLock<Option<CatalogDocument>>>,
    fetches: Arc<AtomicUsize>,
}

impl InMemoryCatalogSource {
    /// Creates a source serving `document`.
    #[must_use]
    pub fn new(document: CatalogDocument) -> Self {
        Self {
            state: Arc::new(RwLock::new(Some(document))),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a source that always fails as unparsable.
    #[must_use]
    pub fn failing() -> Self {
        Self::default()
    }

    /// Replaces the served document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogSourceError::Unreadable`] when lock acquisition fails.
    pub fn set_document(&self, document: CatalogDocument) -> CatalogSourceResult<()> {
        *self.write_state()? = Some(document);
        Ok(())
    }

    /// Makes subsequent fetches fail.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogSourceError::Unreadable`] when lock acquisition fails.
    pub fn set_failing(&self) -> CatalogSourceResult<()> {
        *self.write_state()? = None;
        Ok(())
    }

    /// Returns how many times [`CatalogSource::fetch`] has been called.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn write_state(
        &self,
    ) -> CatalogSourceResult<std::sync::RwLockWriteGuard<'_, Option<CatalogDocument>>> {
        self.state.write().map_err(|err| {
            CatalogSourceError::unreadable(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalogSource {
    fn describe(&self) -> String {
        "in-memory".to_owned()
    }

    async fn fetch(&self) -> CatalogSourceResult<CatalogDocument> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().map_err(|err| {
            CatalogSourceError::unreadable(std::io::Error::other(err.to_string()))
        })?;
        state
            .clone()
            .ok_or_else(|| CatalogSourceError::Unparsable("in-memory source set to fail".to_owned()))
    }
}
