//! Adapter implementations for the catalogue source port.

pub mod file;
pub mod memory;
