//! In-memory secret cache repository.

use crate::secrets::{
    domain::SecretCache,
    ports::{SecretCacheError, SecretCacheRepository, SecretCacheResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory secret cache.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretCache {
    state: Arc<RwLock<SecretCache>>,
}

impl InMemorySecretCache {
    /// Creates a repository holding `cache`.
    #[must_use]
    pub fn new(cache: SecretCache) -> Self {
        Self {
            state: Arc::new(RwLock::new(cache)),
        }
    }
}

#[async_trait]
impl SecretCacheRepository for InMemorySecretCache {
    async fn load(&self) -> SecretCacheResult<SecretCache> {
        let state = self.state.read().map_err(|err| {
            SecretCacheError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.clone())
    }

    async fn save(&self, cache: &SecretCache) -> SecretCacheResult<()> {
        let mut state = self.state.write().map_err(|err| {
            SecretCacheError::persistence(std::io::Error::other(err.to_string()))
        })?;
        *state = cache.clone();
        Ok(())
    }
}
