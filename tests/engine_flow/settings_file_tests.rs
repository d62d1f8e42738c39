//! Engine flows against a settings document and caches on disk.

use camino::Utf8PathBuf;
use mcp_explorer::config::EngineConfig;
use mcp_explorer::engine::{EngineComponents, ExplorerEngine, domain::InstallOutcome};
use mcp_explorer::secrets::adapters::environment::EnvironmentPrompt;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const CATALOG: &str = r#"{
  "version": "2.1.0",
  "lastUpdated": "2025-01-15",
  "totalServers": 2,
  "servers": [
    {
      "id": "brave-search",
      "name": "Brave Search",
      "description": "Web search through the Brave API",
      "category": "Search",
      "tags": ["search", "web"],
      "installCommand": "npm install -g @modelcontextprotocol/server-brave-search",
      "requirements": {
        "environment": {
          "BRAVE_API_KEY": "required",
          "BRAVE_REGION": "required",
          "BRAVE_SAFE_SEARCH": "moderate"
        }
      }
    },
    {
      "id": "time-server",
      "name": "Time",
      "category": "Utilities",
      "mcpConfig": { "command": "uvx", "args": ["mcp-server-time", "--local-timezone=<YOUR_TIMEZONE>"] },
      "requirements": { "environment": { "TIMEZONE": "Europe/London" } }
    }
  ]
}"#;

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    fn read_json(&self, name: &str) -> Value {
        let text = std::fs::read_to_string(self.path(name)).expect("file readable");
        serde_json::from_str(&text).expect("file is JSON")
    }

    fn config(&self) -> EngineConfig {
        EngineConfig {
            catalog_path: Some(self.path("catalog.json")),
            settings_path: Some(self.path("settings.json")),
            secret_cache_path: Some(self.path("env-cache.json")),
            verification_delay_ms: 0,
            run_package_install: false,
            run_package_uninstall: false,
            ..EngineConfig::default()
        }
    }

    fn engine(&self) -> ExplorerEngine<DefaultClock> {
        let prompt = EnvironmentPrompt::from_values([
            ("BRAVE_API_KEY", "bsk-secret"),
            ("BRAVE_REGION", "uk"),
        ]);
        let config = self.config();
        let components = EngineComponents::from_config(&config, Arc::new(DefaultClock), Arc::new(prompt))
            .expect("components build");
        ExplorerEngine::new(components, &config)
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
    std::fs::write(root.join("catalog.json"), CATALOG).expect("write catalog");
    std::fs::write(
        root.join("settings.json"),
        serde_json::to_string_pretty(&json!({
            "editor.fontSize": 14,
            "mcp": { "servers": { "legacy-tool": { "command": "legacy", "args": [] } } }
        }))
        .expect("serialise settings"),
    )
    .expect("write settings");
    Workspace { _dir: dir, root }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn install_preserves_unrelated_settings_and_caches_safe_values(workspace: Workspace) {
    let engine = workspace.engine();

    let outcome = engine
        .install("brave-search", &CancellationToken::new())
        .await
        .expect("install succeeds");

    assert!(matches!(outcome, InstallOutcome::Installed { .. }));
    let settings = workspace.read_json("settings.json");
    assert_eq!(settings["editor.fontSize"], json!(14));
    assert_eq!(settings["mcp"]["servers"]["legacy-tool"]["command"], json!("legacy"));
    assert_eq!(
        settings["mcp"]["servers"]["brave-search"],
        json!({
            "command": "npx",
            "args": ["@modelcontextprotocol/server-brave-search"],
            "type": "stdio",
            "env": {
                "BRAVE_API_KEY": "bsk-secret",
                "BRAVE_REGION": "uk",
                "BRAVE_SAFE_SEARCH": "moderate"
            }
        })
    );

    let cache = workspace.read_json("env-cache.json");
    assert_eq!(cache, json!({ "brave-search": { "BRAVE_REGION": "uk", "BRAVE_SAFE_SEARCH": "moderate" } }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_launch_arguments_are_substituted(workspace: Workspace) {
    let engine = workspace.engine();

    engine
        .install("time-server", &CancellationToken::new())
        .await
        .expect("install succeeds");

    let settings = workspace.read_json("settings.json");
    assert_eq!(
        settings["mcp"]["servers"]["time"]["args"],
        json!(["mcp-server-time", "--local-timezone=Europe/London"])
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uninstall_leaves_other_entries_alone(workspace: Workspace) {
    let engine = workspace.engine();
    engine
        .install("brave-search", &CancellationToken::new())
        .await
        .expect("install succeeds");

    engine.uninstall("brave-search").await.expect("uninstall succeeds");

    let settings = workspace.read_json("settings.json");
    assert_eq!(
        settings["mcp"]["servers"],
        json!({ "legacy-tool": { "command": "legacy", "args": [] } })
    );
    assert!(engine.validate_store().await.expect("validate").is_valid);
}
