//! Error types for catalogue domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or parsing catalogue values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogDomainError {
    /// The catalogue identifier is empty after trimming.
    #[error("catalog entry identifier must not be empty")]
    EmptyCatalogId,

    /// The catalogue document is not valid JSON or does not match the schema.
    #[error("catalog document could not be parsed: {0}")]
    InvalidDocument(String),
}
