//! Error types for launch-configuration synthesis.

use crate::catalog::domain::CatalogId;
use thiserror::Error;

/// Reasons a catalogue entry cannot be turned into a launch configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SynthesisError {
    /// The descriptor looks like a package-manager install but names no
    /// package that could be extracted.
    #[error("cannot extract a package from install descriptor of {catalog_id}: {descriptor}")]
    UnresolvableDescriptor {
        /// Catalogue entry identifier.
        catalog_id: CatalogId,
        /// The offending descriptor text.
        descriptor: String,
    },

    /// The entry has neither a usable descriptor nor a link for manual setup.
    #[error("catalog entry {0} has no install descriptor and no homepage or repository link")]
    InsufficientDescriptor(CatalogId),
}
