//! Command runner services.

mod installer;

pub use installer::{DEFAULT_EXCERPT_CHARS, PackageInstaller, RuntimeCheck};
