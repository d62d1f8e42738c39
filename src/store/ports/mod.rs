//! Port definitions for the configuration store.

mod store;

pub use store::{ConfigurationStore, ConfigurationStoreError, ConfigurationStoreResult};
