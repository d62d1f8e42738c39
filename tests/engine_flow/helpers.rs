//! Shared fixtures for engine integration tests.

use async_trait::async_trait;
use mcp_explorer::catalog::{
    adapters::memory::InMemoryCatalogSource,
    domain::{CatalogDocument, CatalogEntry, CatalogId, builtin_entries},
    ports::CatalogSource,
};
use mcp_explorer::config::EngineConfig;
use mcp_explorer::engine::{EngineComponents, ExplorerEngine};
use mcp_explorer::runner::{
    domain::{CommandOutput, CommandSpec},
    ports::{CommandRunner, CommandRunnerResult},
};
use mcp_explorer::secrets::{
    adapters::{environment::EnvironmentPrompt, memory::InMemorySecretCache},
    ports::SecretCacheRepository,
};
use mcp_explorer::store::{adapters::memory::InMemoryConfigurationStore, ports::ConfigurationStore};
use mockable::DefaultClock;
use std::sync::{Arc, Mutex};

/// Runner that succeeds for every command and remembers what it ran.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<CommandSpec>>,
}

impl RecordingRunner {
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .expect("runner lock")
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> CommandRunnerResult<CommandOutput> {
        self.commands
            .lock()
            .expect("runner lock")
            .push(command.clone());
        Ok(CommandOutput {
            status: Some(0),
            stdout: "v20.11.0\n".to_owned(),
            stderr: String::new(),
        })
    }
}

pub fn catalog_id(value: &str) -> CatalogId {
    CatalogId::new(value).expect("valid catalog id")
}

/// The built-in catalogue plus one entry with an explicit launch command.
pub fn catalog() -> Vec<CatalogEntry> {
    let mut entries = builtin_entries();
    entries.push(
        CatalogEntry::new(catalog_id("figma-mcp"), "Figma")
            .with_description("Design file access")
            .with_category("Design")
            .with_install_command("npx -y figma-developer-mcp --stdio"),
    );
    entries
}

pub fn quiet_config() -> EngineConfig {
    EngineConfig {
        verification_delay_ms: 0,
        ..EngineConfig::default()
    }
}

pub struct MemoryEngine {
    pub engine: ExplorerEngine<DefaultClock>,
    pub store: Arc<InMemoryConfigurationStore>,
    pub runner: Arc<RecordingRunner>,
}

pub fn memory_engine(store: InMemoryConfigurationStore, config: &EngineConfig) -> MemoryEngine {
    let store = Arc::new(store);
    let runner = Arc::new(RecordingRunner::default());
    let source: Arc<dyn CatalogSource> =
        Arc::new(InMemoryCatalogSource::new(CatalogDocument::new("1.0.0", catalog())));
    let store_port: Arc<dyn ConfigurationStore> = store.clone();
    let cache: Arc<dyn SecretCacheRepository> = Arc::new(InMemorySecretCache::default());
    let runner_port: Arc<dyn CommandRunner> = runner.clone();
    let components = EngineComponents {
        clock: Arc::new(DefaultClock),
        catalog_sources: vec![source],
        store: store_port,
        secret_cache: cache,
        prompt: Arc::new(EnvironmentPrompt::default()),
        runner: runner_port,
    };
    MemoryEngine {
        engine: ExplorerEngine::new(components, config),
        store,
        runner,
    }
}
