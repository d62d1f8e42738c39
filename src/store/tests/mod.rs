//! Unit tests for the configuration store context.

mod domain_tests;
