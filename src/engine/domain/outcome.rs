//! Install outcomes.

use crate::launch::domain::LaunchConfiguration;
use crate::store::domain::StoreId;

/// Non-error result of [`crate::engine::ExplorerEngine::install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The configuration was written and verified.
    Installed {
        /// Key the entry was written under.
        store_id: StoreId,
        /// What was written.
        launch: LaunchConfiguration,
    },
    /// Cancellation was observed before anything was written.
    Cancelled,
}
