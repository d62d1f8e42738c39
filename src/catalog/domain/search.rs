//! Free-text search and category queries over catalogue entries.

use super::CatalogEntry;
use std::collections::BTreeSet;

/// Returns entries whose name, description, tags, category, or author
/// contain `query`, ignoring case.
///
/// A blank query yields no results rather than the whole catalogue.
#[must_use]
pub fn search_entries<'a, I>(entries: I, query: &str) -> Vec<CatalogEntry>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    let lowered = query.trim().to_lowercase();
    if lowered.is_empty() {
        return Vec::new();
    }

    entries
        .into_iter()
        .filter(|entry| entry.matches_query(&lowered))
        .cloned()
        .collect()
}

/// Returns the sorted set of distinct categories.
#[must_use]
pub fn categories<'a, I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    entries
        .into_iter()
        .map(|entry| entry.category().to_owned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Returns entries whose category equals `category` exactly.
#[must_use]
pub fn entries_in_category<'a, I>(entries: I, category: &str) -> Vec<CatalogEntry>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    entries
        .into_iter()
        .filter(|entry| entry.category() == category)
        .cloned()
        .collect()
}
