//! Engine configuration.
//!
//! Configuration is read from a TOML document and then overlaid with
//! `MCP_EXPLORER_*` environment variables. Every field has a default, so an
//! empty document is a valid configuration.

use crate::catalog::services::DEFAULT_CATALOG_TTL;
use crate::launch::services::{
    DEFAULT_CONTAINER_ENGINE, DEFAULT_NODE_RUNNER, DEFAULT_PYTHON_RUNNER,
    InstallDescriptorSynthesizer,
};
use crate::runner::services::DEFAULT_EXCERPT_CHARS;
use crate::store::adapters::settings_file::DEFAULT_SETTINGS_KEY_PATH;
use crate::store::services::DEFAULT_VERIFICATION_DELAY;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;


/// Prefix of environment variables that override configuration fields.
pub const ENV_PREFIX: &str = "MCP_EXPLORER_";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration file {path}: {source}")]
    Unreadable {
        /// File path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },

    /// The configuration document is not valid TOML for this schema.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// An environment override could not be parsed.
    #[error("invalid value for {variable}: {value:?}")]
    InvalidOverride {
        /// Environment variable name.
        variable: String,
        /// Offending value.
        value: String,
    },
}

/// Settings for an [`crate::engine::ExplorerEngine`] and its adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Local catalogue document.
    pub catalog_path: Option<Utf8PathBuf>,
    /// Remote catalogue location, consulted by a host-provided source.
    pub registry_url: Option<String>,
    /// Settings document holding the configuration store.
    pub settings_path: Option<Utf8PathBuf>,
    /// Key path of the server map inside the settings document.
    pub settings_key_path: Vec<String>,
    /// Side-store for non-sensitive environment values.
    pub secret_cache_path: Option<Utf8PathBuf>,
    /// Age after which the cached catalogue is reloaded.
    pub catalog_ttl_secs: u64,
    /// Pause between a store write and its read-back.
    pub verification_delay_ms: u64,
    /// Runner for node-ecosystem packages.
    pub node_runner: String,
    /// Runner for python-ecosystem packages.
    pub python_runner: String,
    /// Engine for container descriptors that name no known engine.
    pub container_engine: String,
    /// Whether package installs run before configuration.
    pub run_package_install: bool,
    /// Whether package removal runs after unconfiguration.
    pub run_package_uninstall: bool,
    /// Characters of command error text kept for display.
    pub diagnostic_excerpt_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            registry_url: None,
            settings_path: None,
            settings_key_path: DEFAULT_SETTINGS_KEY_PATH.map(str::to_owned).to_vec(),
            secret_cache_path: None,
            catalog_ttl_secs: DEFAULT_CATALOG_TTL.as_secs(),
            verification_delay_ms: u64::try_from(DEFAULT_VERIFICATION_DELAY.as_millis())
                .unwrap_or(u64::MAX),
            node_runner: DEFAULT_NODE_RUNNER.to_owned(),
            python_runner: DEFAULT_PYTHON_RUNNER.to_owned(),
            container_engine: DEFAULT_CONTAINER_ENGINE.to_owned(),
            run_package_install: true,
            run_package_uninstall: true,
            diagnostic_excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unreadable`] when the file cannot be read and
    /// [`ConfigError::Invalid`] when it does not parse.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let unreadable = |err: std::io::Error| ConfigError::Unreadable {
            path: path.to_owned(),
            source: Arc::new(err),
        };
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            unreadable(std::io::Error::from(std::io::ErrorKind::InvalidInput))
        })?;
        let text = Dir::open_ambient_dir(parent, ambient_authority())
            .and_then(|dir| dir.read_to_string(file_name))
            .map_err(unreadable)?;
        Self::from_toml_str(&text)
    }

    /// Applies `MCP_EXPLORER_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] for unparsable values.
    pub fn with_process_env(self) -> Result<Self, ConfigError> {
        self.with_env_overrides(std::env::vars())
    }

    /// Applies `MCP_EXPLORER_*` overrides from `vars`.
    ///
    /// Field names are upper-cased after the prefix, for example
    /// `MCP_EXPLORER_CATALOG_TTL_SECS`. The key path is dot-separated.
    /// Unknown variables with the prefix are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] for unparsable values.
    pub fn with_env_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, raw) in vars {
            let Some(field) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = raw.as_ref();
            let variable = key.as_ref();
            match field {
                "CATALOG_PATH" => self.catalog_path = Some(value.into()),
                "REGISTRY_URL" => self.registry_url = Some(value.to_owned()),
                "SETTINGS_PATH" => self.settings_path = Some(value.into()),
                "SETTINGS_KEY_PATH" => {
                    self.settings_key_path = value
                        .split('.')
                        .filter(|segment| !segment.is_empty())
                        .map(str::to_owned)
                        .collect();
                }
                "SECRET_CACHE_PATH" => self.secret_cache_path = Some(value.into()),
                "CATALOG_TTL_SECS" => self.catalog_ttl_secs = parse(variable, value)?,
                "VERIFICATION_DELAY_MS" => self.verification_delay_ms = parse(variable, value)?,
                "NODE_RUNNER" => self.node_runner = value.to_owned(),
                "PYTHON_RUNNER" => self.python_runner = value.to_owned(),
                "CONTAINER_ENGINE" => self.container_engine = value.to_owned(),
                "RUN_PACKAGE_INSTALL" => self.run_package_install = parse_flag(variable, value)?,
                "RUN_PACKAGE_UNINSTALL" => {
                    self.run_package_uninstall = parse_flag(variable, value)?;
                }
                "DIAGNOSTIC_EXCERPT_CHARS" => {
                    self.diagnostic_excerpt_chars = parse(variable, value)?;
                }
                _ => {}
            }
        }
        Ok(self)
    }

    /// Returns the catalogue cache lifetime.
    #[must_use]
    pub const fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }

    /// Returns the verification pause.
    #[must_use]
    pub const fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }

    /// Builds the descriptor synthesizer for the configured runners.
    #[must_use]
    pub fn synthesizer(&self) -> InstallDescriptorSynthesizer {
        InstallDescriptorSynthesizer::new(self.node_runner.clone(), self.python_runner.clone())
            .with_container_engine(self.container_engine.clone())
    }
}

fn parse<T: FromStr>(variable: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid_override(variable, value))
}

fn parse_flag(variable: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid_override(variable, value)),
    }
}

fn invalid_override(variable: &str, value: &str) -> ConfigError {
    ConfigError::InvalidOverride {
        variable: variable.to_owned(),
        value: value.to_owned(),
    }
}
