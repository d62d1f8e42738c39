//! External command execution for package installs and runtime probes.
//!
//! The engine decides which command to run and how to read its result;
//! [`ports::CommandRunner`] decides how a process is created.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
