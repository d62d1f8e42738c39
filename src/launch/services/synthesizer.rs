//! Turns catalogue entries into launch configurations.

use crate::catalog::domain::CatalogEntry;
use crate::launch::domain::{
    Ecosystem, LaunchConfiguration, ParsedDescriptor, SynthesisError, is_container_engine,
    parse_container_text, parse_install_text, substitute_env,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Package runner used for node-ecosystem packages.
pub const DEFAULT_NODE_RUNNER: &str = "npx";
/// Package runner used for python-ecosystem packages.
pub const DEFAULT_PYTHON_RUNNER: &str = "uvx";
/// Engine used to run container descriptors.
pub const DEFAULT_CONTAINER_ENGINE: &str = "docker";

/// Builds [`LaunchConfiguration`] values from catalogue entries.
///
/// Synthesis is deterministic: the same entry and resolved environment
/// always produce the same configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDescriptorSynthesizer {
    node_runner: String,
    python_runner: String,
    container_engine: String,
}

impl Default for InstallDescriptorSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_RUNNER, DEFAULT_PYTHON_RUNNER)
    }
}

impl InstallDescriptorSynthesizer {
    /// Creates a synthesizer with the given package runners.
    #[must_use]
    pub fn new(node_runner: impl Into<String>, python_runner: impl Into<String>) -> Self {
        Self {
            node_runner: node_runner.into(),
            python_runner: python_runner.into(),
            container_engine: DEFAULT_CONTAINER_ENGINE.to_owned(),
        }
    }

    /// Replaces the container engine used for container descriptors whose
    /// leading token is not a known engine.
    #[must_use]
    pub fn with_container_engine(mut self, engine: impl Into<String>) -> Self {
        self.container_engine = engine.into();
        self
    }

    /// Returns the runner command for an ecosystem.
    #[must_use]
    pub fn runner_for(&self, ecosystem: Ecosystem) -> &str {
        match ecosystem {
            Ecosystem::Node => &self.node_runner,
            Ecosystem::Python => &self.python_runner,
        }
    }

    /// Classifies the install descriptor of `entry`.
    ///
    /// An explicit `{command, args}` pair takes precedence over any text
    /// descriptor. Returns `None` when no descriptor form is recognised.
    #[must_use]
    pub fn classify(&self, entry: &CatalogEntry) -> Option<ParsedDescriptor> {
        if let Some(explicit) = entry.explicit_launch() {
            return Some(ParsedDescriptor::Explicit {
                command: explicit.command().to_owned(),
                args: explicit.args().to_vec(),
            });
        }
        entry
            .install_command()
            .and_then(parse_install_text)
            .or_else(|| entry.docker_command().and_then(parse_container_text))
    }

    /// Synthesises the launch configuration for `entry`.
    ///
    /// `resolved_env` holds the values gathered for the entry's environment
    /// requirements; they are substituted into the arguments and attached
    /// as the configuration's environment.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::UnresolvableDescriptor`] when a
    /// package-manager descriptor names no package, and
    /// [`SynthesisError::InsufficientDescriptor`] when the entry has neither
    /// a usable descriptor nor a link for manual configuration.
    pub fn synthesize(
        &self,
        entry: &CatalogEntry,
        resolved_env: &BTreeMap<String, String>,
    ) -> Result<LaunchConfiguration, SynthesisError> {
        let mut env = entry
            .explicit_launch()
            .map(|explicit| explicit.env().clone())
            .unwrap_or_default();

        let (command, args) = match self.classify(entry) {
            Some(ParsedDescriptor::Explicit { command, args }) => (command, args),
            Some(ParsedDescriptor::Parsed { ecosystem, package }) => (
                self.runner_for(ecosystem).to_owned(),
                vec![package.as_str().to_owned()],
            ),
            Some(ParsedDescriptor::Container { command, args }) => {
                if is_container_engine(&command) {
                    (command, args)
                } else {
                    (self.container_engine.clone(), args)
                }
            }
            Some(ParsedDescriptor::Unresolvable) => {
                return Err(SynthesisError::UnresolvableDescriptor {
                    catalog_id: entry.id().clone(),
                    descriptor: entry.install_command().unwrap_or_default().to_owned(),
                });
            }
            None => {
                return entry.links().primary().map_or_else(
                    || Err(SynthesisError::InsufficientDescriptor(entry.id().clone())),
                    |link| {
                        debug!(catalog_id = %entry.id(), link, "falling back to manual configuration");
                        Ok(LaunchConfiguration::manual(link))
                    },
                );
            }
        };

        env.extend(
            resolved_env
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        let substituted = substitute_env(&args, resolved_env);
        debug!(catalog_id = %entry.id(), command, "synthesised launch configuration");
        Ok(LaunchConfiguration::new(command, substituted).with_env(env))
    }
}
