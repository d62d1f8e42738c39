//! Configuration store adapters.

pub mod memory;
pub mod settings_file;
