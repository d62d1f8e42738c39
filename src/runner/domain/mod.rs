//! Command runner domain model.

mod command;
mod error;
mod package;

pub use command::{CommandOutput, CommandSpec, excerpt};
pub use error::CommandExecutionFailure;
pub use package::{Runtime, RuntimeProbe, install_command, runtime_probes, uninstall_command};
