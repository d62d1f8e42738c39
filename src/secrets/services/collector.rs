//! Resolves the environment an entry needs before it can be launched.

use crate::catalog::domain::{CatalogEntry, CatalogId, EnvironmentRequirement};
use crate::secrets::{
    domain::{ResolvedEnvironment, SecretCache, is_sensitive},
    ports::{
        PromptCapability, ReuseRequest, SecretCacheRepository, SecretCacheResult, ValueRequest,
    },
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Validation message shown when an empty answer is rejected.
pub const EMPTY_VALUE_MESSAGE: &str = "Value cannot be empty";

/// Gathers environment values from defaults, the cache and the user.
pub struct SecretCollector<R>
where
    R: SecretCacheRepository + ?Sized,
{
    cache: Arc<R>,
}

impl<R> SecretCollector<R>
where
    R: SecretCacheRepository + ?Sized,
{
    /// Creates a collector over a secret-cache repository.
    #[must_use]
    pub const fn new(cache: Arc<R>) -> Self {
        Self { cache }
    }

    /// Resolves every environment variable declared by `entry`.
    ///
    /// Defaults are used verbatim. Required non-sensitive variables found in
    /// the cache are offered for reuse; everything else is asked for until
    /// a non-blank answer arrives. Returns `None` as soon as the user
    /// cancels any prompt.
    ///
    /// An unreadable cache is treated as empty.
    pub async fn resolve<P>(&self, entry: &CatalogEntry, prompt: &P) -> Option<ResolvedEnvironment>
    where
        P: PromptCapability + ?Sized,
    {
        let cache = self.load_cache().await;
        let mut resolved = ResolvedEnvironment::new();

        for variable in entry.requirements().environment() {
            let name = variable.name();
            let value = match variable.requirement() {
                EnvironmentRequirement::Default(value) => value.clone(),
                EnvironmentRequirement::Required => {
                    if let Some(reused) = offer_reuse(entry.id(), name, &cache, prompt).await? {
                        reused
                    } else {
                        ask_until_valid(entry.id(), name, prompt).await?
                    }
                }
            };
            resolved.insert(name, value);
        }

        debug!(catalog_id = %entry.id(), resolved = resolved.values().len(), "environment resolved");
        Some(resolved)
    }

    /// Stores the non-sensitive values of a successful install under
    /// `catalog_id`.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the cache cannot be read or saved.
    pub async fn commit(
        &self,
        catalog_id: &CatalogId,
        resolved: &ResolvedEnvironment,
    ) -> SecretCacheResult<()> {
        let mut keep = resolved.non_sensitive().peekable();
        if keep.peek().is_none() {
            return Ok(());
        }
        let mut cache = self.cache.load().await?;
        cache.merge(catalog_id, keep);
        self.cache.save(&cache).await?;
        info!(%catalog_id, "cached non-sensitive environment values");
        Ok(())
    }

    async fn load_cache(&self) -> SecretCache {
        match self.cache.load().await {
            Ok(cache) => cache,
            Err(err) => {
                warn!(error = %err, "secret cache unreadable; prompting for every value");
                SecretCache::new()
            }
        }
    }
}

/// Returns `None` on cancellation, `Some(None)` when no cached value is
/// reused.
async fn offer_reuse<P>(
    catalog_id: &CatalogId,
    name: &str,
    cache: &SecretCache,
    prompt: &P,
) -> Option<Option<String>>
where
    P: PromptCapability + ?Sized,
{
    if is_sensitive(name) {
        return Some(None);
    }
    let Some(cached) = cache.get(catalog_id, name) else {
        return Some(None);
    };
    let request = ReuseRequest {
        catalog_id: catalog_id.clone(),
        name: name.to_owned(),
        cached_value: cached.to_owned(),
    };
    let accepted = prompt.confirm_reuse(&request).await?;
    Some(accepted.then(|| cached.to_owned()))
}

async fn ask_until_valid<P>(catalog_id: &CatalogId, name: &str, prompt: &P) -> Option<String>
where
    P: PromptCapability + ?Sized,
{
    let mut request = ValueRequest {
        catalog_id: catalog_id.clone(),
        name: name.to_owned(),
        sensitive: is_sensitive(name),
        validation_message: None,
    };
    loop {
        let answer = prompt.ask_value(&request).await?;
        if !answer.trim().is_empty() {
            return Some(answer);
        }
        debug!(%catalog_id, name, "rejected empty value");
        request.validation_message = Some(EMPTY_VALUE_MESSAGE.to_owned());
    }
}
