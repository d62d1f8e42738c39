//! Server catalogue loading, caching, and search.
//!
//! The catalogue is the list of installable MCP server descriptors known to
//! the engine. It is replaced wholesale on every refresh and never mutated in
//! place. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
