//! Unit tests for the secrets context.

mod cache_tests;
