//! MCP Explorer: catalogue reconciliation and launch-configuration synthesis
//! for Model Context Protocol servers.
//!
//! The crate compares a catalogue of installable MCP servers with the
//! configuration store of an MCP client, turns free-form install descriptors
//! into runnable launch configurations, and edits the store safely while
//! other tools may be editing it too.
//!
//! # Architecture
//!
//! Every context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types and functions with no infrastructure dependencies
//! - **Ports**: Async trait interfaces at external seams
//! - **Adapters**: In-memory and filesystem implementations of ports
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`catalog`]: Catalogue entries, sources, search and the TTL cache
//! - [`launch`]: Install-descriptor parsing and launch-configuration synthesis
//! - [`reconciliation`]: Matching catalogue entries to configured store keys
//! - [`secrets`]: Environment collection and the non-sensitive value cache
//! - [`store`]: The configuration store, its mutator and validator
//! - [`runner`]: Package-manager commands and runtime probes
//! - [`engine`]: The API front ends call
//! - [`config`]: Engine configuration from TOML and the environment

pub mod catalog;
pub mod config;
pub mod engine;
pub mod launch;
pub mod reconciliation;
pub mod runner;
pub mod secrets;
pub mod store;

#[cfg(test)]
mod test_support;
