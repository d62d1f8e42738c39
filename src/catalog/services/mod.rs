//! Application services for catalogue loading.

mod store;

pub use store::{CatalogLoad, CatalogOrigin, CatalogStore, CatalogUnavailable, DEFAULT_CATALOG_TTL};
