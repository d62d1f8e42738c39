//! Persistence port for the secret cache.

use crate::secrets::domain::SecretCache;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for secret-cache persistence.
pub type SecretCacheResult<T> = Result<T, SecretCacheError>;

/// Side-store of non-sensitive values.
#[async_trait]
pub trait SecretCacheRepository: Send + Sync {
    /// Loads the cache. A store that does not exist yet yields an empty
    /// cache.
    async fn load(&self) -> SecretCacheResult<SecretCache>;

    /// Replaces the stored cache.
    async fn save(&self, cache: &SecretCache) -> SecretCacheResult<()>;
}

/// Errors returned by secret-cache repositories.
#[derive(Debug, Clone, Error)]
pub enum SecretCacheError {
    /// The stored cache is not valid JSON of the expected shape.
    #[error("invalid secret cache document: {0}")]
    InvalidDocument(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SecretCacheError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
