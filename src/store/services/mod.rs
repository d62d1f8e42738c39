//! Configuration store services.

mod mutator;
mod validator;

pub use mutator::{
    ConfigurationMutator, DEFAULT_MAX_WRITE_ATTEMPTS, DEFAULT_REMOVAL_MEMORY,
    DEFAULT_VERIFICATION_DELAY, MutationError, MutationResult, RemovalOutcome,
};
pub use validator::ConfigurationValidator;
