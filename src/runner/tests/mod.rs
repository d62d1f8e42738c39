//! Unit tests for the runner context.
