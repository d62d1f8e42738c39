//! Sensitive-name classification.

/// Substrings that mark a variable name as sensitive, matched
/// case-insensitively.
pub const SENSITIVE_MARKERS: [&str; 4] = ["token", "key", "password", "secret"];

/// Returns whether `name` must never be persisted.
#[must_use]
pub fn is_sensitive(name: &str) -> bool {
    let lowered = name.to_lowercase();
    SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}
