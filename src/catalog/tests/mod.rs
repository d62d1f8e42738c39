//! Unit tests for the catalogue context.
