//! Unit tests for the launch context.

mod synthesizer_tests;
