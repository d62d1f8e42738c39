//! Launch configuration value object.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Command written for entries that need manual configuration.
///
/// The resulting store entry is intentionally non-functional; tooling can
/// recognise it by this command.
pub const MANUAL_CONFIGURATION_COMMAND: &str = "manual-configuration-required";

/// Transport used to talk to a launched server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Standard input and output of a child process.
    #[default]
    Stdio,
}

impl TransportKind {
    /// Returns the canonical store representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
        }
    }
}

/// The canonical `{command, args, type, env}` shape needed to run a server.
///
/// Serialises to the configuration-store entry schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfiguration {
    command: String,
    args: Vec<String>,
    #[serde(rename = "type")]
    transport: TransportKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<String, String>,
}

impl LaunchConfiguration {
    /// Creates a stdio launch configuration without environment values.
    #[must_use]
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            transport: TransportKind::Stdio,
            env: BTreeMap::new(),
        }
    }

    /// Creates the sentinel configuration pointing the user at `link`.
    #[must_use]
    pub fn manual(link: &str) -> Self {
        Self::new(MANUAL_CONFIGURATION_COMMAND, vec![link.to_owned()])
    }

    /// Replaces environment values.
    #[must_use]
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Returns the executable command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the command-line arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the transport kind.
    #[must_use]
    pub const fn transport(&self) -> TransportKind {
        self.transport
    }

    /// Returns environment values passed to the server.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Returns whether this is the manual-configuration sentinel.
    #[must_use]
    pub fn is_manual_sentinel(&self) -> bool {
        self.command == MANUAL_CONFIGURATION_COMMAND
    }

    /// Converts the configuration into a store entry value.
    #[must_use]
    pub fn to_store_value(&self) -> Value {
        let mut entry = serde_json::Map::new();
        entry.insert("command".to_owned(), Value::String(self.command.clone()));
        entry.insert(
            "args".to_owned(),
            Value::Array(self.args.iter().cloned().map(Value::String).collect()),
        );
        entry.insert(
            "type".to_owned(),
            Value::String(self.transport.as_str().to_owned()),
        );
        if !self.env.is_empty() {
            entry.insert(
                "env".to_owned(),
                Value::Object(
                    self.env
                        .iter()
                        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                        .collect(),
                ),
            );
        }
        Value::Object(entry)
    }
}
