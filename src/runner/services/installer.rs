//! Package installation, removal and runtime probing.

use crate::catalog::domain::CatalogEntry;
use crate::runner::{
    domain::{
        CommandExecutionFailure, CommandOutput, CommandSpec, RuntimeProbe, excerpt,
        install_command, runtime_probes, uninstall_command,
    },
    ports::CommandRunner,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Default number of characters of error text kept for display.
pub const DEFAULT_EXCERPT_CHARS: usize = 500;

/// Result of probing one declared runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeCheck {
    /// The probe that ran.
    pub probe: RuntimeProbe,
    /// Reported version, or `None` when the runtime is unavailable.
    pub version: Option<String>,
}

/// Runs package-manager commands on behalf of the engine.
pub struct PackageInstaller<R>
where
    R: CommandRunner + ?Sized,
{
    runner: Arc<R>,
    excerpt_chars: usize,
}

impl<R> PackageInstaller<R>
where
    R: CommandRunner + ?Sized,
{
    /// Creates an installer over `runner`.
    #[must_use]
    pub const fn new(runner: Arc<R>) -> Self {
        Self {
            runner,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }

    /// Sets how much error text a failure carries.
    #[must_use]
    pub const fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.excerpt_chars = chars;
        self
    }

    /// Runs the package install step for `entry`, if it has one.
    ///
    /// Returns the command that ran.
    ///
    /// # Errors
    ///
    /// Returns [`CommandExecutionFailure`] when the command cannot start or
    /// exits unsuccessfully.
    pub async fn install(
        &self,
        entry: &CatalogEntry,
    ) -> Result<Option<CommandSpec>, CommandExecutionFailure> {
        let Some(command) = install_command(entry) else {
            debug!(catalog_id = %entry.id(), "no package install step");
            return Ok(None);
        };
        self.execute(&command).await?;
        info!(catalog_id = %entry.id(), %command, "package installed");
        Ok(Some(command))
    }

    /// Runs the package removal step for `entry`, if it has one.
    ///
    /// # Errors
    ///
    /// Returns [`CommandExecutionFailure`] when the command cannot start or
    /// exits unsuccessfully.
    pub async fn uninstall(
        &self,
        entry: &CatalogEntry,
    ) -> Result<Option<CommandSpec>, CommandExecutionFailure> {
        let Some(command) = uninstall_command(entry) else {
            return Ok(None);
        };
        self.execute(&command).await?;
        info!(catalog_id = %entry.id(), %command, "package removed");
        Ok(Some(command))
    }

    /// Probes every runtime `entry` declares. Missing runtimes are logged
    /// as warnings; requirements are advisory.
    pub async fn check_runtimes(&self, entry: &CatalogEntry) -> Vec<RuntimeCheck> {
        let mut checks = Vec::new();
        for probe in runtime_probes(entry.requirements()) {
            let version = match self.runner.run(&probe.command).await {
                Ok(output) if output.success() => Some(output.stdout.trim().to_owned()),
                Ok(_) | Err(_) => None,
            };
            if version.is_none() {
                warn!(
                    catalog_id = %entry.id(),
                    runtime = probe.runtime.as_str(),
                    constraint = %probe.constraint,
                    "declared runtime not found"
                );
            }
            checks.push(RuntimeCheck { probe, version });
        }
        checks
    }

    /// Runs `command`, turning spawn errors and non-zero exits into
    /// [`CommandExecutionFailure`]. The full output goes to the error log.
    ///
    /// # Errors
    ///
    /// Returns [`CommandExecutionFailure`] on spawn error or non-zero exit.
    pub async fn execute(
        &self,
        command: &CommandSpec,
    ) -> Result<CommandOutput, CommandExecutionFailure> {
        match self.runner.run(command).await {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => {
                error!(
                    %command,
                    status = ?output.status,
                    stdout = %output.stdout,
                    stderr = %output.stderr,
                    "command exited unsuccessfully"
                );
                Err(CommandExecutionFailure {
                    command: command.to_string(),
                    status: output.status,
                    excerpt: excerpt(output.diagnostic_text(), self.excerpt_chars),
                })
            }
            Err(err) => {
                let text = err.to_string();
                error!(%command, error = %text, "command could not be started");
                Err(CommandExecutionFailure {
                    command: command.to_string(),
                    status: None,
                    excerpt: excerpt(&text, self.excerpt_chars),
                })
            }
        }
    }
}
