//! Catalogue queries, search and store inspection through the engine.

use super::support::{MockRunner, harness, harness_with, id, quiet_config};
use crate::engine::domain::InstallationStatus;
use crate::reconciliation::domain::SHADOW_CATEGORY;
use crate::secrets::adapters::environment::EnvironmentPrompt;
use crate::store::{adapters::memory::InMemoryConfigurationStore, domain::StoreId};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn configured_store() -> InMemoryConfigurationStore {
    InMemoryConfigurationStore::with_entries([
        (
            StoreId::new("filesystem").expect("valid id"),
            json!({"command": "npx", "args": ["@modelcontextprotocol/server-filesystem"], "type": "stdio"}),
        ),
        (
            StoreId::new("kubernetes").expect("valid id"),
            json!({"command": "kubectl-mcp", "args": []}),
        ),
    ])
}

#[rstest]
#[case("", 0)]
#[case("   ", 0)]
#[case("TRAVEL", 1)]
#[case("server", 2)]
#[tokio::test(flavor = "multi_thread")]
async fn search_matches_case_insensitively(#[case] query: &str, #[case] expected: usize) {
    let harness = harness();

    assert_eq!(harness.engine.search(query).await.len(), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_includes_shadow_entries(configured_store: InMemoryConfigurationStore) {
    let harness = harness_with(
        configured_store,
        EnvironmentPrompt::default(),
        MockRunner::new(),
        &quiet_config(),
    );

    let found = harness.engine.search("kubernetes").await;

    assert_eq!(found.len(), 1);
    assert_eq!(found.first().map(|entry| entry.category()), Some(SHADOW_CATEGORY));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconcile_updates_tracked_statuses(configured_store: InMemoryConfigurationStore) {
    let harness = harness_with(
        configured_store,
        EnvironmentPrompt::default(),
        MockRunner::new(),
        &quiet_config(),
    );

    let result = harness.engine.reconcile().await.expect("reconcile");

    assert!(result.is_installed(&id("filesystem-server")));
    assert_eq!(result.shadows().len(), 1);
    assert_eq!(
        harness.engine.status(&id("filesystem-server")),
        InstallationStatus::Installed
    );
    assert_eq!(
        harness.engine.status(&id("weather-server")),
        InstallationStatus::NotInstalled
    );
}

#[rstest]
#[case("filesystem-server", true)]
#[case("kubernetes", true)]
#[case("weather-server", false)]
#[tokio::test(flavor = "multi_thread")]
async fn is_configured_covers_catalog_and_shadow_entries(
    configured_store: InMemoryConfigurationStore,
    #[case] entry_id: &str,
    #[case] expected: bool,
) {
    let harness = harness_with(
        configured_store,
        EnvironmentPrompt::default(),
        MockRunner::new(),
        &quiet_config(),
    );

    assert_eq!(
        harness.engine.is_configured(entry_id).await.expect("query"),
        expected
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_entry_returns_the_raw_store_value(configured_store: InMemoryConfigurationStore) {
    let harness = harness_with(
        configured_store,
        EnvironmentPrompt::default(),
        MockRunner::new(),
        &quiet_config(),
    );

    let (store_id, value) = harness
        .engine
        .configured_entry("filesystem-server")
        .await
        .expect("query")
        .expect("configured");

    assert_eq!(store_id.as_str(), "filesystem");
    assert_eq!(value["command"], json!("npx"));
    assert_eq!(
        harness.engine.configured_entries().await.expect("query").len(),
        2
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn validation_accepts_well_formed_entries(configured_store: InMemoryConfigurationStore) {
    let harness = harness_with(
        configured_store,
        EnvironmentPrompt::default(),
        MockRunner::new(),
        &quiet_config(),
    );

    let report = harness.engine.validate_store().await.expect("validate");

    assert!(report.is_valid);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn catalog_queries_cover_categories_and_lookup() {
    let harness = harness();

    assert_eq!(
        harness.engine.categories().await,
        vec!["Development".to_owned(), "Travel".to_owned()]
    );
    assert_eq!(harness.engine.entries_by_category("Travel").await.len(), 1);
    assert!(
        harness
            .engine
            .entry_by_id("weather-server")
            .await
            .expect("lookup")
            .is_some()
    );
    assert!(harness.engine.installed().await.expect("query").is_empty());
}
