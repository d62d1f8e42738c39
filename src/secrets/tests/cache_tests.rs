//! Secret cache and sensitivity tests.

use crate::catalog::domain::CatalogId;
use crate::secrets::{
    adapters::file::JsonSecretCacheFile,
    domain::{ResolvedEnvironment, SecretCache, is_sensitive},
    ports::SecretCacheRepository,
};
use camino::Utf8PathBuf;
use rstest::rstest;
use std::collections::BTreeMap;

fn catalog_id(value: &str) -> CatalogId {
    CatalogId::new(value).expect("valid id")
}

#[rstest]
#[case("GITHUB_TOKEN", true)]
#[case("api_key", true)]
#[case("DB_PASSWORD", true)]
#[case("ClientSecret", true)]
#[case("KEYBOARD_LAYOUT", true)]
#[case("REGION", false)]
#[case("DATABASE_PATH", false)]
fn sensitivity_is_name_based(#[case] name: &str, #[case] sensitive: bool) {
    assert_eq!(is_sensitive(name), sensitive);
}

#[rstest]
fn merge_drops_sensitive_names_and_overwrites() {
    let id = catalog_id("weather");
    let mut cache = SecretCache::new();
    cache.merge(&id, [("UNITS", "metric"), ("API_KEY", "hidden")]);
    cache.merge(&id, [("UNITS", "imperial")]);

    assert_eq!(cache.get(&id, "UNITS"), Some("imperial"));
    assert_eq!(cache.get(&id, "API_KEY"), None);
}

#[rstest]
fn merge_of_only_sensitive_values_leaves_cache_empty() {
    let mut cache = SecretCache::new();
    cache.merge(&catalog_id("github"), [("GITHUB_TOKEN", "ghp")]);
    assert!(cache.is_empty());
}

#[rstest]
fn deserialisation_discards_sensitive_names() {
    let cache: SecretCache = serde_json::from_str(
        r#"{"weather": {"UNITS": "metric", "API_KEY": "leaked"}, "github": {"GITHUB_TOKEN": "x"}}"#,
    )
    .expect("cache parses");

    let id = catalog_id("weather");
    assert_eq!(
        cache.values_for(&id),
        Some(&BTreeMap::from([("UNITS".to_owned(), "metric".to_owned())]))
    );
    assert!(cache.values_for(&catalog_id("github")).is_none());
}

#[rstest]
fn resolved_debug_output_redacts_sensitive_values() {
    let mut resolved = ResolvedEnvironment::new();
    resolved.insert("API_KEY", "s3cr3t");
    resolved.insert("REGION", "eu-west-1");

    let rendered = format!("{resolved:?}");
    assert!(!rendered.contains("s3cr3t"));
    assert!(rendered.contains("eu-west-1"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn file_repository_round_trips_and_tolerates_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("nested").join("secrets.json"))
        .expect("temp path should be UTF-8");
    let repository = JsonSecretCacheFile::new(path);

    let empty = repository.load().await.expect("missing file loads");
    let mut cache = empty.clone();
    cache.merge(&catalog_id("sqlite"), [("DATABASE_PATH", "/tmp/db.sqlite")]);
    repository.save(&cache).await.expect("save succeeds");

    assert!(empty.is_empty());
    assert_eq!(repository.load().await.expect("reload"), cache);
}
