//! Engine integration tests.
//!
//! Tests are organized into modules by storage backend:
//! - `memory_tests`: Install, reconcile and uninstall over in-memory adapters
//! - `settings_file_tests`: The same flows against JSON files on disk

mod engine_flow {
    pub mod helpers;

    mod memory_tests;
    mod settings_file_tests;
}
