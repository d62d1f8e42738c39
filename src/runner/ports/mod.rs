//! Port definitions for command execution.

mod runner;

pub use runner::{CommandRunner, CommandRunnerError, CommandRunnerResult};
