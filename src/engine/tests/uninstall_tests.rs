//! Uninstall flow tests.

use super::support::{
    MockRunner, exited, harness, harness_over, harness_with, id, quiet_config,
};
use crate::catalog::domain::CatalogEntry;
use crate::config::EngineConfig;
use crate::engine::domain::{EngineError, InstallationStatus};
use crate::secrets::adapters::environment::EnvironmentPrompt;
use crate::store::{
    adapters::memory::InMemoryConfigurationStore,
    domain::StoreId,
    ports::ConfigurationStore,
    services::{MutationError, RemovalOutcome},
};
use rstest::rstest;
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn store_id(value: &str) -> StoreId {
    StoreId::new(value).expect("valid id")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_twice_is_idempotent() {
    let harness = harness();
    harness
        .engine
        .install("filesystem-server", &CancellationToken::new())
        .await
        .expect("install succeeds");

    let first = harness
        .engine
        .uninstall("filesystem-server")
        .await
        .expect("first removal");
    let second = harness
        .engine
        .uninstall("filesystem-server")
        .await
        .expect("second removal");

    assert_eq!(first, RemovalOutcome::Removed(store_id("filesystem")));
    assert!(matches!(second, RemovalOutcome::AlreadyRemoved(_)));
    assert!(harness.store.snapshot().await.expect("snapshot").is_empty());
    assert_eq!(
        harness.engine.status(&id("filesystem-server")),
        InstallationStatus::NotInstalled
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removal_uses_the_reconciled_store_key() {
    let store = InMemoryConfigurationStore::with_entries([
        (store_id("weather"), json!({"command": "uvx", "args": ["mcp-weather"]})),
        (store_id("kubernetes"), json!({"command": "kubectl-mcp", "args": []})),
    ]);
    let harness = harness_with(
        store,
        EnvironmentPrompt::default(),
        MockRunner::new(),
        &quiet_config(),
    );

    let outcome = harness
        .engine
        .uninstall("weather-server")
        .await
        .expect("removal");

    assert_eq!(outcome, RemovalOutcome::Removed(store_id("weather")));
    let snapshot = harness.store.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.ids(), vec!["kubernetes".to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removal_ignores_keys_that_only_contain_the_entry_name() {
    let store = InMemoryConfigurationStore::with_entries([(
        store_id("github"),
        json!({"command": "npx", "args": ["@modelcontextprotocol/server-github"]}),
    )]);
    let entries = vec![
        CatalogEntry::new(id("git-server"), "Git"),
        CatalogEntry::new(id("github-server"), "GitHub"),
    ];
    let harness = harness_over(
        entries,
        store,
        EnvironmentPrompt::default(),
        MockRunner::new(),
        &quiet_config(),
    );

    let err = harness
        .engine
        .uninstall("git-server")
        .await
        .expect_err("git has no configuration of its own");

    assert!(matches!(
        err,
        EngineError::Mutation(MutationError::NotConfigured(_))
    ));
    let snapshot = harness.store.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.ids(), vec!["github".to_owned()]);

    let outcome = harness
        .engine
        .uninstall("github-server")
        .await
        .expect("github removal");
    assert_eq!(outcome, RemovalOutcome::Removed(store_id("github")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shadow_entries_can_be_removed() {
    let store = InMemoryConfigurationStore::with_entries([(
        store_id("kubernetes"),
        json!({"command": "kubectl-mcp", "args": []}),
    )]);
    let harness = harness_with(
        store,
        EnvironmentPrompt::default(),
        MockRunner::new(),
        &quiet_config(),
    );

    let outcome = harness.engine.uninstall("kubernetes").await.expect("removal");

    assert_eq!(outcome, RemovalOutcome::Removed(store_id("kubernetes")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_an_unconfigured_entry_reports_not_configured() {
    let harness = harness();

    let err = harness
        .engine
        .uninstall("filesystem-server")
        .await
        .expect_err("nothing to remove");

    assert!(matches!(
        err,
        EngineError::Mutation(MutationError::NotConfigured(_))
    ));
    assert!(err.is_idempotence_signal());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn package_removal_failure_does_not_fail_the_uninstall() {
    let store = InMemoryConfigurationStore::with_entries([(
        store_id("filesystem"),
        json!({"command": "npx", "args": ["@modelcontextprotocol/server-filesystem"], "type": "stdio"}),
    )]);
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|command| {
            command.program() == "npm"
                && command.args() == ["uninstall", "@modelcontextprotocol/server-filesystem"]
        })
        .times(1)
        .returning(|_| Ok(exited(1)));
    let config = EngineConfig {
        run_package_uninstall: true,
        ..quiet_config()
    };
    let harness = harness_with(store, EnvironmentPrompt::default(), runner, &config);

    let outcome = harness
        .engine
        .uninstall("filesystem-server")
        .await
        .expect("removal succeeds");

    assert_eq!(outcome, RemovalOutcome::Removed(store_id("filesystem")));
    assert!(harness.store.snapshot().await.expect("snapshot").is_empty());
}
