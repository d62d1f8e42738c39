//! Matching predicates between catalogue entries and store identifiers.

use crate::catalog::domain::CatalogEntry;
use crate::store::domain::strip_server_suffix;
use serde::{Deserialize, Serialize};

/// One heuristic deciding whether a store identifier belongs to an entry.
///
/// All comparisons are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPredicate {
    /// Store id equals the catalogue id.
    ExactId,
    /// Store id equals the catalogue id without its `-server` suffix.
    SuffixStrippedId,
    /// Store id equals the catalogue name with whitespace runs replaced by
    /// hyphens.
    HyphenatedName,
    /// Either the hyphenated name or the store id contains the other.
    Containment,
}

/// Predicates in the order they are consulted by default.
pub const DEFAULT_PREDICATES: [MatchPredicate; 4] = [
    MatchPredicate::ExactId,
    MatchPredicate::SuffixStrippedId,
    MatchPredicate::HyphenatedName,
    MatchPredicate::Containment,
];

impl MatchPredicate {
    /// Returns whether a match under this predicate names the entry itself
    /// rather than something that merely resembles it.
    ///
    /// Only identifying matches may be used as a removal target.
    #[must_use]
    pub const fn identifies_entry(self) -> bool {
        !matches!(self, Self::Containment)
    }

    /// Returns whether `store_id` belongs to `entry` under this predicate.
    #[must_use]
    pub fn matches(self, entry: &CatalogEntry, store_id: &str) -> bool {
        let candidate = store_id.trim().to_lowercase();
        if candidate.is_empty() {
            return false;
        }
        let catalog_id = entry.id().as_str().to_lowercase();

        match self {
            Self::ExactId => catalog_id == candidate,
            Self::SuffixStrippedId => strip_server_suffix(&catalog_id) == candidate,
            Self::HyphenatedName => hyphenated_name(entry) == candidate,
            Self::Containment => {
                let name = hyphenated_name(entry);
                !name.is_empty() && (name.contains(&candidate) || candidate.contains(&name))
            }
        }
    }
}

fn hyphenated_name(entry: &CatalogEntry) -> String {
    entry
        .name()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
