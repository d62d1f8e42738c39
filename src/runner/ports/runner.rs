//! Command runner port.

use crate::runner::domain::{CommandOutput, CommandSpec};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for command runner operations.
pub type CommandRunnerResult<T> = Result<T, CommandRunnerError>;

/// Executes external commands to completion.
///
/// A non-zero exit is not an error at this level; callers inspect
/// [`CommandOutput::status`]. Dropping the returned future must stop the
/// process.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` and captures its output.
    async fn run(&self, command: &CommandSpec) -> CommandRunnerResult<CommandOutput>;
}

/// Errors returned by command runners.
#[derive(Debug, Clone, Error)]
pub enum CommandRunnerError {
    /// The process could not be started.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// Rendered command line.
        command: String,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },
}

impl CommandRunnerError {
    /// Wraps a spawn failure for `command`.
    #[must_use]
    pub fn spawn(command: &CommandSpec, err: std::io::Error) -> Self {
        Self::Spawn {
            command: command.to_string(),
            source: Arc::new(err),
        }
    }
}
