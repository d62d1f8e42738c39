//! Command failure type.

use thiserror::Error;

/// An external command could not be spawned or exited unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command `{command}` failed ({}): {excerpt}", describe_status(.status))]
pub struct CommandExecutionFailure {
    /// Rendered command line.
    pub command: String,
    /// Exit code, absent for spawn errors and signals.
    pub status: Option<i32>,
    /// Captured error text, truncated for display.
    pub excerpt: String,
}

fn describe_status(status: &Option<i32>) -> String {
    status.map_or_else(|| "no exit status".to_owned(), |code| format!("exit status {code}"))
}
