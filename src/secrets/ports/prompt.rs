//! Interactive prompt capability.
//!
//! The engine decides what to ask and which answers are acceptable; how the
//! question is shown belongs to the host. Every method returns `None` when
//! the user dismisses the prompt, which aborts the whole resolution.

use crate::catalog::domain::CatalogId;
use async_trait::async_trait;

/// Offer to reuse a cached value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReuseRequest {
    /// Entry being installed.
    pub catalog_id: CatalogId,
    /// Variable name.
    pub name: String,
    /// Value found in the cache.
    pub cached_value: String,
}

/// Request for a variable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueRequest {
    /// Entry being installed.
    pub catalog_id: CatalogId,
    /// Variable name.
    pub name: String,
    /// Whether the answer should be masked while typed.
    pub sensitive: bool,
    /// Why the previous answer was rejected, when re-prompting.
    pub validation_message: Option<String>,
}

/// Host-provided user interaction.
#[async_trait]
pub trait PromptCapability: Send + Sync {
    /// Asks whether to reuse a cached value. `Some(false)` declines.
    async fn confirm_reuse(&self, request: &ReuseRequest) -> Option<bool>;

    /// Asks for a value.
    async fn ask_value(&self, request: &ValueRequest) -> Option<String>;
}
