//! Engine domain types.

mod error;
mod outcome;
mod status;

pub use error::{EngineError, EngineResult};
pub use outcome::InstallOutcome;
pub use status::{InstallationStatus, StatusEvent};
