//! Ports for prompting and secret-cache persistence.

mod cache;
mod prompt;

pub use cache::{SecretCacheError, SecretCacheRepository, SecretCacheResult};
pub use prompt::{PromptCapability, ReuseRequest, ValueRequest};
