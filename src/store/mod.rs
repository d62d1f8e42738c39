//! The external configuration store and every write made to it.
//!
//! The store is a key to launch-configuration map embedded in a larger
//! settings document that other tools also edit. Writes go through
//! [`services::ConfigurationMutator`], which serialises work per normalised
//! identifier and uses the port's compare-and-swap to detect interleaved
//! edits. [`services::ConfigurationValidator`] checks structure without
//! consulting the catalogue.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
