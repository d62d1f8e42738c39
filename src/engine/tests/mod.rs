//! Unit tests for the engine facade.

mod query_tests;
mod support;
mod uninstall_tests;
