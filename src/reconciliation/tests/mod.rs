//! Unit tests for the reconciliation context.
