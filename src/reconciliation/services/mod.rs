//! Reconciliation services.

mod engine;

pub use engine::ReconciliationEngine;
