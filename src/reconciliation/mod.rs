//! Reconciliation of catalogue entries against configured store identifiers.
//!
//! Catalogue identifiers and store keys are written by different people and
//! rarely agree exactly. Matching runs an ordered table of
//! [`domain::MatchPredicate`] variants; store keys that no entry claims become
//! [`domain::ShadowEntry`] records so that hand-written configuration stays
//! visible.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
