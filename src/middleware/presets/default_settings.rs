//! Fill unset call parameters from configured defaults.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::middleware::LanguageModelMiddleware;
use crate::traits::LanguageModel;
use crate::types::{CallOptions, CallType};

/// Defaults applied to every call. Values set on the call win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<u32>,
    /// Used only when the call sets no stop sequences.
    pub stop_sequences: Vec<String>,
    /// Merged under the call's headers.
    pub headers: HashMap<String, String>,
}

impl DefaultSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    pub fn with_stop_sequences(mut self, stops: Vec<String>) -> Self {
        self.stop_sequences = stops;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Merge these defaults into `params`.
    pub fn apply(&self, mut params: CallOptions) -> CallOptions {
        params.temperature = params.temperature.or(self.temperature);
        params.top_p = params.top_p.or(self.top_p);
        params.max_output_tokens = params.max_output_tokens.or(self.max_output_tokens);
        if params.stop_sequences.is_empty() {
            params.stop_sequences = self.stop_sequences.clone();
        }
        for (name, value) in &self.headers {
            params
                .headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        params
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefaultSettingsMiddleware {
    settings: DefaultSettings,
}

impl DefaultSettingsMiddleware {
    pub fn new(settings: DefaultSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl LanguageModelMiddleware for DefaultSettingsMiddleware {
    async fn transform_params(
        &self,
        _call_type: CallType,
        params: CallOptions,
        _model: &Arc<dyn LanguageModel>,
    ) -> Result<CallOptions, LlmError> {
        Ok(self.settings.apply(params))
    }
}
