//! Command runner backed by `tokio::process`.

use crate::runner::{
    domain::{CommandOutput, CommandSpec},
    ports::{CommandRunner, CommandRunnerError, CommandRunnerResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::process::Stdio;
use tracing::debug;

/// Spawns commands as child processes with piped output.
///
/// Children are killed when the run future is dropped, which is how
/// cancellation reaches them.
#[derive(Debug, Clone, Default)]
pub struct TokioCommandRunner {
    env: BTreeMap<String, String>,
}

impl TokioCommandRunner {
    /// Creates a runner inheriting the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds environment variables to every spawned command.
    #[must_use]
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, command: &CommandSpec) -> CommandRunnerResult<CommandOutput> {
        debug!(%command, "spawning command");
        let output = tokio::process::Command::new(command.program())
            .args(command.args())
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| CommandRunnerError::spawn(command, err))?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
