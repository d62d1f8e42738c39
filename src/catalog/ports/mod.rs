//! Port contracts for catalogue sources.

mod source;

pub use source::{CatalogSource, CatalogSourceError, CatalogSourceResult};
