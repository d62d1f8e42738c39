//! Package-manager commands derived from catalogue entries.

use super::CommandSpec;
use crate::catalog::domain::{CatalogEntry, Requirements};
use crate::launch::domain::{Ecosystem, ParsedDescriptor, parse_install_text, split_command_line};

/// Returns the install command to run before configuring `entry`.
///
/// Only package-manager install descriptors produce a command; runner
/// invocations, container commands and explicit launches need no install
/// step.
#[must_use]
pub fn install_command(entry: &CatalogEntry) -> Option<CommandSpec> {
    let text = entry.install_command()?;
    match parse_install_text(text)? {
        ParsedDescriptor::Parsed { .. } => CommandSpec::from_tokens(split_command_line(text)),
        ParsedDescriptor::Explicit { .. }
        | ParsedDescriptor::Container { .. }
        | ParsedDescriptor::Unresolvable => None,
    }
}

/// Returns the command that removes the package installed for `entry`.
#[must_use]
pub fn uninstall_command(entry: &CatalogEntry) -> Option<CommandSpec> {
    match parse_install_text(entry.install_command()?)? {
        ParsedDescriptor::Parsed {
            ecosystem: Ecosystem::Node,
            package,
        } => Some(CommandSpec::new("npm", ["uninstall", package.as_str()])),
        ParsedDescriptor::Parsed {
            ecosystem: Ecosystem::Python,
            package,
        } => Some(CommandSpec::new("pip", ["uninstall", package.as_str(), "-y"])),
        ParsedDescriptor::Explicit { .. }
        | ParsedDescriptor::Container { .. }
        | ParsedDescriptor::Unresolvable => None,
    }
}

/// Runtime an entry declares a requirement on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    /// Node.js.
    Node,
    /// Python.
    Python,
}

impl Runtime {
    /// Returns the runtime's display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Python => "python",
        }
    }
}

/// Version query for one declared runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeProbe {
    /// Runtime being probed.
    pub runtime: Runtime,
    /// Declared version constraint, advisory only.
    pub constraint: String,
    /// Command printing the installed version.
    pub command: CommandSpec,
}

/// Returns one probe per runtime declared in `requirements`.
#[must_use]
pub fn runtime_probes(requirements: &Requirements) -> Vec<RuntimeProbe> {
    [
        (Runtime::Node, requirements.node()),
        (Runtime::Python, requirements.python()),
    ]
    .into_iter()
    .filter_map(|(runtime, constraint)| {
        constraint.map(|declared| RuntimeProbe {
            runtime,
            constraint: declared.to_owned(),
            command: CommandSpec::new(runtime.as_str(), ["--version"]),
        })
    })
    .collect()
}
