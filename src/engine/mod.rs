//! The engine facade consumed by user interfaces.
//!
//! [`ExplorerEngine`] wires the catalogue, reconciliation, secret
//! collection, synthesis, package commands and store mutation into the
//! operations a front end needs: load, reconcile, search, install,
//! uninstall, configuration checks and validation. Install progress is
//! published as [`domain::StatusEvent`] values.

pub mod domain;
pub mod services;

pub use services::{EngineComponents, ExplorerEngine};

#[cfg(test)]
mod tests;
