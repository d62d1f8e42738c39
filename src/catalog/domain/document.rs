//! Catalogue document: `{ version, servers: CatalogEntry[] }`.

use super::{CatalogDomainError, CatalogEntry};
use serde::{Deserialize, Serialize};

/// A parsed catalogue document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_servers: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    categories: Vec<String>,
    #[serde(default)]
    servers: Vec<CatalogEntry>,
}

impl CatalogDocument {
    /// Creates a document from a version label and a list of entries.
    #[must_use]
    pub fn new(version: impl Into<String>, servers: Vec<CatalogEntry>) -> Self {
        Self {
            version: version.into(),
            servers,
            ..Self::default()
        }
    }

    /// Parses a catalogue document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidDocument`] when the text is not
    /// valid JSON or an entry fails validation.
    pub fn parse(text: &str) -> Result<Self, CatalogDomainError> {
        serde_json::from_str(text)
            .map_err(|err| CatalogDomainError::InvalidDocument(err.to_string()))
    }

    /// Returns the document version label.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the publication timestamp, when declared.
    #[must_use]
    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    /// Returns the entries in document order.
    #[must_use]
    pub fn servers(&self) -> &[CatalogEntry] {
        &self.servers
    }

    /// Consumes the document and returns its entries.
    #[must_use]
    pub fn into_servers(self) -> Vec<CatalogEntry> {
        self.servers
    }
}
