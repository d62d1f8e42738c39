//! Non-interactive prompt answered from environment variables.

use crate::secrets::ports::{PromptCapability, ReuseRequest, ValueRequest};
use async_trait::async_trait;
use std::collections::HashMap;

/// Answers prompts from a fixed set of variables.
///
/// Cached values are always reused. A variable that is missing or blank
/// cancels the resolution, so headless installs fail instead of hanging.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentPrompt {
    values: HashMap<String, String>,
}

impl EnvironmentPrompt {
    /// Captures the current process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            values: std::env::vars().collect(),
        }
    }

    /// Uses the given values instead of the process environment.
    #[must_use]
    pub fn from_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl PromptCapability for EnvironmentPrompt {
    async fn confirm_reuse(&self, _request: &ReuseRequest) -> Option<bool> {
        Some(true)
    }

    async fn ask_value(&self, request: &ValueRequest) -> Option<String> {
        if request.validation_message.is_some() {
            return None;
        }
        self.values
            .get(&request.name)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }
}
