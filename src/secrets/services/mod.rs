//! Secret collection services.

mod collector;

pub use collector::{EMPTY_VALUE_MESSAGE, SecretCollector};
