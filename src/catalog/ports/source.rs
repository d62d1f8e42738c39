//! Source port for catalogue documents.
//!
//! The engine consults sources in order: the local catalogue file first,
//! then any remote mirror the host application supplies. Network transport
//! is the host's concern; no HTTP adapter ships with this crate.

use crate::catalog::domain::CatalogDocument;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalogue source operations.
pub type CatalogSourceResult<T> = Result<T, CatalogSourceError>;

/// Provider of catalogue documents.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short human-readable description used in logs, such as a path or URL.
    fn describe(&self) -> String;

    /// Fetches and parses the catalogue document.
    async fn fetch(&self) -> CatalogSourceResult<CatalogDocument>;
}

/// Errors returned by catalogue sources.
#[derive(Debug, Clone, Error)]
pub enum CatalogSourceError {
    /// The source does not exist, such as a missing local file.
    #[error("catalog source not found: {0}")]
    NotFound(String),

    /// The source exists but could not be read.
    #[error("catalog source unreadable: {0}")]
    Unreadable(Arc<dyn std::error::Error + Send + Sync>),

    /// The source content is not a valid catalogue document.
    #[error("catalog source unparsable: {0}")]
    Unparsable(String),
}

impl CatalogSourceError {
    /// Wraps an I/O or transport failure.
    pub fn unreadable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unreadable(Arc::new(err))
    }
}
