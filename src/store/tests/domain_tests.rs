//! Store identifier and snapshot tests.

use crate::store::domain::{StoreDomainError, StoreId, StoreRevision, StoreSnapshot, strip_server_suffix};
use rstest::rstest;
use serde_json::json;

fn id(value: &str) -> StoreId {
    StoreId::new(value).expect("valid store id")
}

#[rstest]
#[case("filesystem-server", "filesystem")]
#[case("filesystem", "filesystem")]
#[case("-server", "-server")]
#[case("server", "server")]
#[case("my-server-server", "my-server")]
fn normalisation_strips_one_suffix(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(id(raw).normalized().as_str(), expected);
    assert_eq!(strip_server_suffix(raw), expected);
}

#[rstest]
fn blank_ids_are_rejected() {
    assert_eq!(StoreId::new("   "), Err(StoreDomainError::EmptyStoreId));
}

#[rstest]
#[case("github-server", &["github-server", "github", "github-server-server"])]
#[case("github", &["github", "github-server"])]
fn removal_candidates_follow_lookup_order(#[case] raw: &str, #[case] expected: &[&str]) {
    let candidates: Vec<String> = id(raw)
        .removal_candidates()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(candidates, expected);
}

#[rstest]
fn revision_tracks_content_and_order() {
    let first = vec![(id("a"), json!({"command": "x"})), (id("b"), json!({}))];
    let reordered = vec![(id("b"), json!({})), (id("a"), json!({"command": "x"}))];

    assert_eq!(StoreRevision::of(&first), StoreRevision::of(&first.clone()));
    assert_ne!(StoreRevision::of(&first), StoreRevision::of(&reordered));
    assert_eq!(StoreRevision::of(&[]).as_str().len(), 64);
}

#[rstest]
fn snapshot_from_map_keeps_order_and_raw_keys() {
    let map = json!({"zeta": {}, " ": {}, " alpha ": {}, "alpha": {}})
        .as_object()
        .cloned()
        .expect("object literal");
    let snapshot = StoreSnapshot::from_map(map);

    assert_eq!(snapshot.ids(), vec!["zeta", " ", " alpha ", "alpha"]);
    assert_eq!(snapshot.key_for(&id("alpha")), Some(&id("alpha")));
    assert!(!snapshot.contains(&id("beta")));
}

#[rstest]
fn padded_keys_are_found_by_their_trimmed_form() {
    let snapshot = StoreSnapshot::new(vec![(StoreId::from_store_key(" spaced "), json!({}))]);

    assert!(!snapshot.contains(&id("spaced")));
    assert_eq!(
        snapshot.key_for(&id("spaced")).map(StoreId::as_str),
        Some(" spaced ")
    );
}
