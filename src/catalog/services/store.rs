//! Catalogue store with TTL caching and a fallback chain.

use crate::catalog::{
    domain::{CatalogEntry, CatalogId, builtin_entries, categories, entries_in_category},
    ports::{CatalogSource, CatalogSourceError},
};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default age after which a cached catalogue is reloaded.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(5 * 60);

/// Where the entries of a [`CatalogLoad`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Freshly read from the described source.
    Source(String),
    /// Served from the in-process cache.
    Cache,
    /// The built-in fallback set.
    BuiltIn,
}

/// Non-fatal condition reported when no source could be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogUnavailable {
    /// One message per failed source, in consultation order.
    pub failures: Vec<String>,
}

/// Outcome of [`CatalogStore::load`]. Always usable, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLoad {
    entries: Arc<[CatalogEntry]>,
    origin: CatalogOrigin,
    unavailable: Option<CatalogUnavailable>,
}

impl CatalogLoad {
    /// Returns the loaded entries in catalogue order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Returns where the entries came from.
    #[must_use]
    pub const fn origin(&self) -> &CatalogOrigin {
        &self.origin
    }

    /// Returns the unavailability condition, if every source failed.
    #[must_use]
    pub const fn unavailable(&self) -> Option<&CatalogUnavailable> {
        self.unavailable.as_ref()
    }

    /// Finds an entry by catalogue identifier.
    #[must_use]
    pub fn find(&self, id: &CatalogId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Returns the sorted distinct categories.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        categories(self.entries.iter())
    }

    /// Returns entries in `category`.
    #[must_use]
    pub fn in_category(&self, category: &str) -> Vec<CatalogEntry> {
        entries_in_category(self.entries.iter(), category)
    }
}

#[derive(Debug, Clone)]
struct CachedCatalog {
    entries: Arc<[CatalogEntry]>,
    fetched_at: DateTime<Utc>,
}

/// Holds the known catalogue and decides when to reload it.
///
/// Sources are consulted in order; the first success wins. On total failure
/// the last good cache is served, then the built-in fallback set.
pub struct CatalogStore<C>
where
    C: Clock + Send + Sync,
{
    sources: Vec<Arc<dyn CatalogSource>>,
    clock: Arc<C>,
    ttl: TimeDelta,
    cache: RwLock<Option<CachedCatalog>>,
}

impl<C> CatalogStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a store over `sources` with the default TTL.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn CatalogSource>>, clock: Arc<C>) -> Self {
        Self {
            sources,
            clock,
            ttl: to_time_delta(DEFAULT_CATALOG_TTL),
            cache: RwLock::new(None),
        }
    }

    /// Overrides the cache TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = to_time_delta(ttl);
        self
    }

    /// Loads the catalogue.
    ///
    /// Returns cached entries when `force` is false and the cache is younger
    /// than the TTL. Never fails: source errors degrade to cached or built-in
    /// data with a [`CatalogUnavailable`] condition attached.
    pub async fn load(&self, force: bool) -> CatalogLoad {
        let now = self.clock.utc();
        if !force && let Some(cached) = self.fresh_cache(now) {
            debug!(entries = cached.entries.len(), "serving cached catalog");
            return CatalogLoad {
                entries: cached.entries,
                origin: CatalogOrigin::Cache,
                unavailable: None,
            };
        }

        let mut failures = Vec::new();
        for source in &self.sources {
            match source.fetch().await {
                Ok(document) => {
                    let entries: Arc<[CatalogEntry]> = document.into_servers().into();
                    info!(
                        source = %source.describe(),
                        entries = entries.len(),
                        "loaded catalog"
                    );
                    self.store_cache(CachedCatalog {
                        entries: entries.clone(),
                        fetched_at: self.clock.utc(),
                    });
                    return CatalogLoad {
                        entries,
                        origin: CatalogOrigin::Source(source.describe()),
                        unavailable: None,
                    };
                }
                Err(err) => {
                    log_source_failure(source.as_ref(), &err);
                    failures.push(format!("{}: {err}", source.describe()));
                }
            }
        }

        let unavailable = Some(CatalogUnavailable { failures });
        if let Some(cached) = self.cached() {
            warn!("all catalog sources failed, serving last good catalog");
            return CatalogLoad {
                entries: cached.entries,
                origin: CatalogOrigin::Cache,
                unavailable,
            };
        }

        warn!("all catalog sources failed, serving built-in catalog");
        CatalogLoad {
            entries: builtin_entries().into(),
            origin: CatalogOrigin::BuiltIn,
            unavailable,
        }
    }

    /// Drops the cached catalogue so the next load reads the sources.
    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.write() {
            *cache = None;
        }
    }

    fn fresh_cache(&self, now: DateTime<Utc>) -> Option<CachedCatalog> {
        self.cached()
            .filter(|cached| now.signed_duration_since(cached.fetched_at) < self.ttl)
    }

    fn cached(&self) -> Option<CachedCatalog> {
        self.cache.read().ok().and_then(|cache| cache.clone())
    }

    fn store_cache(&self, cached: CachedCatalog) {
        match self.cache.write() {
            Ok(mut cache) => *cache = Some(cached),
            Err(err) => warn!(error = %err, "catalog cache lock poisoned, cache not updated"),
        }
    }
}

fn to_time_delta(ttl: Duration) -> TimeDelta {
    TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX)
}

fn log_source_failure(source: &dyn CatalogSource, err: &CatalogSourceError) {
    match err {
        CatalogSourceError::NotFound(_) => {
            debug!(source = %source.describe(), "catalog source not present");
        }
        _ => warn!(source = %source.describe(), error = %err, "catalog source failed"),
    }
}
