//! Engine error type.

use crate::catalog::domain::{CatalogDomainError, CatalogId};
use crate::launch::domain::SynthesisError;
use crate::runner::domain::CommandExecutionFailure;
use crate::store::{
    domain::StoreDomainError, ports::ConfigurationStoreError, services::MutationError,
};
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures surfaced by [`crate::engine::ExplorerEngine`].
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The identifier is blank.
    #[error(transparent)]
    InvalidEntryId(#[from] CatalogDomainError),

    /// The identifier cannot be used as a store key.
    #[error(transparent)]
    InvalidStoreId(#[from] StoreDomainError),

    /// No catalogue entry has this identifier.
    #[error("unknown catalog entry: {0}")]
    UnknownEntry(CatalogId),

    /// Secret collection was aborted by the user.
    #[error("environment collection for {0} was aborted")]
    MissingEnvironmentVariable(CatalogId),

    /// No launch configuration could be synthesised.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// A package-manager command failed.
    #[error(transparent)]
    CommandExecution(#[from] CommandExecutionFailure),

    /// The configuration store rejected a mutation.
    #[error(transparent)]
    Mutation(#[from] MutationError),

    /// The configuration store could not be read.
    #[error(transparent)]
    Store(#[from] ConfigurationStoreError),
}

impl EngineError {
    /// Returns whether the error is an idempotence signal rather than a
    /// failure: the store already is in the requested state.
    #[must_use]
    pub const fn is_idempotence_signal(&self) -> bool {
        matches!(
            self,
            Self::Mutation(MutationError::AlreadyConfigured(_) | MutationError::NotConfigured(_))
        )
    }
}
