//! Engine assembly over in-memory adapters.

use crate::catalog::{
    adapters::memory::InMemoryCatalogSource,
    domain::{CatalogDocument, CatalogEntry, CatalogId, EnvironmentRequirement, Requirements},
    ports::CatalogSource,
};
use crate::config::EngineConfig;
use crate::engine::{EngineComponents, ExplorerEngine};
use crate::runner::{
    domain::{CommandOutput, CommandSpec},
    ports::{CommandRunner, CommandRunnerResult},
};
use crate::secrets::{
    adapters::{environment::EnvironmentPrompt, memory::InMemorySecretCache},
    ports::SecretCacheRepository,
};
use crate::store::{adapters::memory::InMemoryConfigurationStore, ports::ConfigurationStore};
use crate::test_support::ManualClock;
use async_trait::async_trait;
use mockall::mock;
use std::sync::Arc;

mock! {
    pub Runner {}

    #[async_trait]
    impl CommandRunner for Runner {
        async fn run(&self, command: &CommandSpec) -> CommandRunnerResult<CommandOutput>;
    }
}

pub fn id(value: &str) -> CatalogId {
    CatalogId::new(value).expect("valid id")
}

pub fn exited(status: i32) -> CommandOutput {
    CommandOutput {
        status: Some(status),
        stdout: String::new(),
        stderr: if status == 0 {
            String::new()
        } else {
            "ERR! 404".to_owned()
        },
    }
}

/// Runner that succeeds for every command.
pub fn permissive_runner() -> MockRunner {
    let mut runner = MockRunner::new();
    runner.expect_run().returning(|_| Ok(exited(0)));
    runner
}

pub fn filesystem_entry() -> CatalogEntry {
    CatalogEntry::new(id("filesystem-server"), "Filesystem Server")
        .with_description("Local file access")
        .with_category("Development")
        .with_install_command("npm install @modelcontextprotocol/server-filesystem")
}

pub fn weather_entry() -> CatalogEntry {
    CatalogEntry::new(id("weather-server"), "Weather Server")
        .with_description("Forecasts for travel planning")
        .with_category("Travel")
        .with_install_command("pip install mcp-weather")
        .with_requirements(
            Requirements::new()
                .with_environment("WEATHER_REGION", EnvironmentRequirement::Required)
                .with_environment("WEATHER_API_KEY", EnvironmentRequirement::Required)
                .with_environment("WEATHER_UNITS", EnvironmentRequirement::Default("metric".to_owned())),
        )
}

pub fn catalog() -> Vec<CatalogEntry> {
    vec![filesystem_entry(), weather_entry()]
}

pub fn quiet_config() -> EngineConfig {
    EngineConfig {
        verification_delay_ms: 0,
        run_package_install: false,
        run_package_uninstall: false,
        ..EngineConfig::default()
    }
}

pub struct Harness {
    pub engine: ExplorerEngine<ManualClock>,
    pub store: Arc<InMemoryConfigurationStore>,
    pub cache: Arc<InMemorySecretCache>,
}

pub fn harness_with(
    store: InMemoryConfigurationStore,
    prompt: EnvironmentPrompt,
    runner: MockRunner,
    config: &EngineConfig,
) -> Harness {
    harness_over(catalog(), store, prompt, runner, config)
}

pub fn harness_over(
    entries: Vec<CatalogEntry>,
    store: InMemoryConfigurationStore,
    prompt: EnvironmentPrompt,
    runner: MockRunner,
    config: &EngineConfig,
) -> Harness {
    let store = Arc::new(store);
    let cache = Arc::new(InMemorySecretCache::default());
    let source: Arc<dyn CatalogSource> =
        Arc::new(InMemoryCatalogSource::new(CatalogDocument::new("1.0.0", entries)));
    let store_port: Arc<dyn ConfigurationStore> = store.clone();
    let cache_port: Arc<dyn SecretCacheRepository> = cache.clone();
    let components = EngineComponents {
        clock: Arc::new(ManualClock::new()),
        catalog_sources: vec![source],
        store: store_port,
        secret_cache: cache_port,
        prompt: Arc::new(prompt),
        runner: Arc::new(runner),
    };
    Harness {
        engine: ExplorerEngine::new(components, config),
        store,
        cache,
    }
}

pub fn harness() -> Harness {
    harness_with(
        InMemoryConfigurationStore::new(),
        EnvironmentPrompt::default(),
        permissive_runner(),
        &quiet_config(),
    )
}
