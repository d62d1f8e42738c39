//! Install, reconcile and uninstall over in-memory adapters.

use super::helpers::{catalog_id, memory_engine, quiet_config};
use mcp_explorer::engine::domain::{InstallOutcome, InstallationStatus};
use mcp_explorer::reconciliation::domain::SHADOW_TAG;
use mcp_explorer::store::{
    adapters::memory::InMemoryConfigurationStore,
    domain::StoreId,
    ports::ConfigurationStore,
    services::RemovalOutcome,
};
use rstest::rstest;
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn install_then_reconcile_then_uninstall() {
    let fixture = memory_engine(InMemoryConfigurationStore::new(), &quiet_config());
    let filesystem = catalog_id("filesystem-server");

    let outcome = fixture
        .engine
        .install("filesystem-server", &CancellationToken::new())
        .await
        .expect("install succeeds");
    assert!(matches!(
        outcome,
        InstallOutcome::Installed { ref store_id, .. } if store_id.as_str() == "filesystem"
    ));
    assert_eq!(
        fixture.runner.commands(),
        vec![
            "node --version".to_owned(),
            "npm install @modelcontextprotocol/server-filesystem".to_owned(),
        ]
    );

    let reconciled = fixture.engine.reconcile().await.expect("reconcile");
    assert!(reconciled.is_installed(&filesystem));
    assert!(reconciled.shadows().is_empty());

    let removal = fixture
        .engine
        .uninstall("filesystem-server")
        .await
        .expect("uninstall succeeds");
    assert_eq!(
        removal,
        RemovalOutcome::Removed(StoreId::new("filesystem").expect("valid id"))
    );
    assert!(
        fixture
            .runner
            .commands()
            .contains(&"npm uninstall @modelcontextprotocol/server-filesystem".to_owned())
    );
    assert!(!fixture.engine.is_configured("filesystem-server").await.expect("query"));
    assert_eq!(
        fixture.engine.status(&filesystem),
        InstallationStatus::NotInstalled
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hand_written_entries_surface_as_shadows() {
    let store = InMemoryConfigurationStore::with_entries([(
        StoreId::new("kubernetes").expect("valid id"),
        json!({"command": "kubectl-mcp", "args": ["serve"]}),
    )]);
    let fixture = memory_engine(store, &quiet_config());

    let found = fixture.engine.search("kube").await;

    assert_eq!(found.len(), 1);
    let shadow = found.first().expect("one result");
    assert_eq!(shadow.name(), "Kubernetes");
    assert!(shadow.tags().iter().any(|tag| tag == SHADOW_TAG));
    assert!(fixture.engine.is_configured("kubernetes").await.expect("query"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_run_commands_are_written_verbatim() {
    let fixture = memory_engine(InMemoryConfigurationStore::new(), &quiet_config());

    fixture
        .engine
        .install("figma-mcp", &CancellationToken::new())
        .await
        .expect("install succeeds");

    let snapshot = fixture.store.snapshot().await.expect("snapshot");
    assert_eq!(
        snapshot.get(&StoreId::new("figma-mcp").expect("valid id")),
        Some(&json!({
            "command": "npx",
            "args": ["-y", "figma-developer-mcp", "--stdio"],
            "type": "stdio"
        }))
    );
    assert!(fixture.runner.commands().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_installs_of_one_entry_write_once() {
    let fixture = memory_engine(InMemoryConfigurationStore::new(), &quiet_config());
    let engine = &fixture.engine;
    let cancel = CancellationToken::new();

    let (first, second) = tokio::join!(
        engine.install("sqlite-server", &cancel),
        engine.install("sqlite-server", &cancel)
    );

    let installed = [&first, &second]
        .into_iter()
        .filter(|outcome| matches!(outcome, Ok(InstallOutcome::Installed { .. })))
        .count();
    assert_eq!(installed, 1);
    assert!(
        [first, second]
            .into_iter()
            .filter_map(Result::err)
            .all(|err| err.is_idempotence_signal())
    );
    assert_eq!(fixture.store.snapshot().await.expect("snapshot").len(), 1);
}
