//! Command runner adapters.

pub mod process;
