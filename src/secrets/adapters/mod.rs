//! Secret collection adapters.

pub mod environment;
pub mod file;
pub mod memory;
