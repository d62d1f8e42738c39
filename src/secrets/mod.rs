//! Collection of environment values required to launch a server.
//!
//! Values come from catalogue defaults, a side-store of previously entered
//! non-sensitive values, and finally an injected [`ports::PromptCapability`].
//! Names that look like credentials never touch the side-store.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
