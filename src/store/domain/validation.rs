//! Structural validation of store entries.

use super::StoreSnapshot;
use crate::launch::domain::TransportKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of validating the configuration store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Whether no errors were found. Warnings do not affect validity.
    pub is_valid: bool,
    /// One message per structural error.
    pub errors: Vec<String>,
    /// One message per advisory finding.
    pub warnings: Vec<String>,
}

/// Validates every entry of `snapshot`.
///
/// A missing or non-string `command` and a missing or non-array `args` are
/// errors. A transport other than stdio is a warning, as is an empty store.
#[must_use]
pub fn validate_snapshot(snapshot: &StoreSnapshot) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (id, entry) in snapshot.entries() {
        let Some(fields) = entry.as_object() else {
            errors.push(format!("Server '{id}' is not an object"));
            continue;
        };

        if !fields.get("command").is_some_and(Value::is_string) {
            errors.push(format!("Server '{id}' missing 'command' property"));
        }

        let args_valid = fields
            .get("args")
            .and_then(Value::as_array)
            .is_some_and(|args| args.iter().all(Value::is_string));
        if !args_valid {
            errors.push(format!("Server '{id}' missing or invalid 'args' property"));
        }

        let stdio = TransportKind::Stdio.as_str();
        for key in ["type", "transport"] {
            if let Some(transport) = fields.get(key)
                && transport.as_str() != Some(stdio)
            {
                warnings.push(format!(
                    "Server '{id}' uses non-stdio transport: {}",
                    describe(transport)
                ));
            }
        }
    }

    if snapshot.is_empty() {
        warnings.push("No MCP servers configured in settings".to_owned());
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn describe(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_owned)
}
