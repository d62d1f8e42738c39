//! Engine orchestration services.

mod engine;

pub use engine::{EngineComponents, ExplorerEngine, STATUS_CHANNEL_CAPACITY};
