//! Launch-configuration synthesis services.

mod synthesizer;

pub use synthesizer::{
    DEFAULT_CONTAINER_ENGINE, DEFAULT_NODE_RUNNER, DEFAULT_PYTHON_RUNNER,
    InstallDescriptorSynthesizer,
};
