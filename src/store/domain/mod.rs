//! Configuration store domain model.

mod error;
mod ids;
mod snapshot;
mod validation;

pub use error::StoreDomainError;
pub use ids::{SERVER_SUFFIX, StoreId, strip_server_suffix};
pub use snapshot::{StoreRevision, StoreSnapshot};
pub use validation::{ValidationReport, validate_snapshot};
