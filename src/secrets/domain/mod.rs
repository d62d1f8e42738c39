//! Secret collection domain model.

mod cache;
mod resolved;
mod sensitivity;

pub use cache::SecretCache;
pub use resolved::ResolvedEnvironment;
pub use sensitivity::{SENSITIVE_MARKERS, is_sensitive};
