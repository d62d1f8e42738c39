//! Domain model for catalogue entries and catalogue documents.
//!
//! Entries are immutable once loaded. Derived installation status lives in
//! the reconciliation context, never on the entry itself.

mod document;
mod entry;
mod error;
mod fallback;
mod ids;
mod requirements;
mod search;

pub use document::CatalogDocument;
pub use entry::{CatalogEntry, CatalogLinks, ExplicitLaunch};
pub use error::CatalogDomainError;
pub use fallback::builtin_entries;
pub use ids::CatalogId;
pub use requirements::{EnvironmentRequirement, EnvironmentVariable, Requirements};
pub use search::{categories, entries_in_category, search_entries};
