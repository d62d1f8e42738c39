//! Domain model for install descriptors and launch configurations.

mod config;
mod descriptor;
mod error;
mod substitution;

pub use config::{LaunchConfiguration, MANUAL_CONFIGURATION_COMMAND, TransportKind};
pub(crate) use descriptor::parse_container_text;
pub use descriptor::{
    Ecosystem, PackageName, ParsedDescriptor, is_container_engine, parse_install_text,
    split_command_line,
};
pub use error::SynthesisError;
pub use substitution::substitute_env;
