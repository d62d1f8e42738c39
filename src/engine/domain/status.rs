//! Installation status tracking.

use crate::catalog::domain::CatalogId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a catalogue entry from the user's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "kebab-case")]
pub enum InstallationStatus {
    /// No store entry matches.
    NotInstalled,
    /// An install is in progress.
    Installing,
    /// A store entry matches.
    Installed,
    /// The last install or uninstall failed.
    Failed(String),
    /// The last install was cancelled before writing.
    Cancelled,
    /// An uninstall is in progress.
    Uninstalling,
}

impl InstallationStatus {
    /// Returns whether an operation is running.
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::Installing | Self::Uninstalling)
    }
}

impl fmt::Display for InstallationStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled => formatter.write_str("not-installed"),
            Self::Installing => formatter.write_str("installing"),
            Self::Installed => formatter.write_str("installed"),
            Self::Failed(reason) => write!(formatter, "failed: {reason}"),
            Self::Cancelled => formatter.write_str("cancelled"),
            Self::Uninstalling => formatter.write_str("uninstalling"),
        }
    }
}

/// A status change broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    /// Entry whose status changed.
    pub catalog_id: CatalogId,
    /// New status.
    pub status: InstallationStatus,
}
