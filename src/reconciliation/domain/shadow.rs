//! Shadow entries for configured servers missing from the catalogue.

use crate::catalog::domain::{CatalogEntry, CatalogId};

/// Category assigned to shadow entries.
pub const SHADOW_CATEGORY: &str = "User Configured";
/// Description assigned to shadow entries.
pub const SHADOW_DESCRIPTION: &str = "User-configured MCP server (not in registry)";
/// Tag assigned to shadow entries.
pub const SHADOW_TAG: &str = "user-configured";

/// A catalogue-shaped record standing in for an unmatched store entry.
///
/// Its identity is exactly the store identifier it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowEntry {
    store_id: CatalogId,
    name: String,
}

impl ShadowEntry {
    /// Builds a shadow for `store_id`, or `None` when the identifier is blank.
    #[must_use]
    pub fn for_store_id(store_id: &str) -> Option<Self> {
        let id = CatalogId::new(store_id).ok()?;
        let name = display_name_for(id.as_str());
        Some(Self { store_id: id, name })
    }

    /// Returns the store identifier.
    #[must_use]
    pub fn store_id(&self) -> &str {
        self.store_id.as_str()
    }

    /// Returns the generated display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converts the shadow into a catalogue entry carrying the marker
    /// category.
    #[must_use]
    pub fn to_catalog_entry(&self) -> CatalogEntry {
        CatalogEntry::new(self.store_id.clone(), self.name.clone())
            .with_description(SHADOW_DESCRIPTION)
            .with_category(SHADOW_CATEGORY)
            .with_tags([SHADOW_TAG])
    }
}

/// Derives a display name by splitting on `-`/`_` and capitalising each
/// segment.
#[must_use]
pub fn display_name_for(store_id: &str) -> String {
    store_id
        .split(['-', '_'])
        .filter(|segment| !segment.is_empty())
        .map(capitalise)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalise(segment: &str) -> String {
    let mut characters = segment.chars();
    characters.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(characters).collect()
    })
}
