//! Reconciliation domain types.

mod predicate;
mod result;
mod shadow;

pub use predicate::{DEFAULT_PREDICATES, MatchPredicate};
pub use result::{EntryStatus, ReconciliationResult};
pub use shadow::{SHADOW_CATEGORY, SHADOW_DESCRIPTION, SHADOW_TAG, ShadowEntry, display_name_for};
