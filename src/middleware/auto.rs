//! Automatic middleware selection from provider, model and feature flags.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::builder::MiddlewareBuilder;
use super::language_model::LanguageModelMiddleware;
use super::presets::{
    ExtractJsonMiddleware, ExtractReasoningMiddleware, SimulateStreamingMiddleware,
};

pub const EXTRACT_JSON: &str = "extract-json";
pub const EXTRACT_REASONING: &str = "extract-reasoning";
pub const SIMULATE_STREAMING: &str = "simulate-streaming";

/// Model families known to put reasoning inline in the text channel.
const REASONING_FAMILIES: &[&str] = &[
    "deepseek-r1",
    "deepseek-reasoner",
    "qwq",
    "qwen3",
    "gemini",
    "seed-oss",
    "seed_oss",
    "gpt-oss",
    "gpt_oss",
    "thinking",
];

/// Configuration for automatic middleware selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiddlewareConfig {
    pub provider_id: String,
    pub model_id: String,
    /// Add tag-based reasoning extraction for reasoning model families.
    pub enable_reasoning: bool,
    /// Strip code fences around JSON output.
    pub extract_json: bool,
    /// Serve streaming calls from single-shot calls.
    pub simulate_streaming: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            provider_id: String::new(),
            model_id: String::new(),
            enable_reasoning: true,
            extract_json: false,
            simulate_streaming: false,
        }
    }
}

impl MiddlewareConfig {
    pub fn new(provider_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_id: model_id.into(),
            ..Default::default()
        }
    }

    pub fn with_enable_reasoning(mut self, enable: bool) -> Self {
        self.enable_reasoning = enable;
        self
    }

    pub fn with_extract_json(mut self, enable: bool) -> Self {
        self.extract_json = enable;
        self
    }

    pub fn with_simulate_streaming(mut self, enable: bool) -> Self {
        self.simulate_streaming = enable;
        self
    }
}

pub fn is_reasoning_model(model_id: &str) -> bool {
    let model_lower = model_id.to_lowercase();
    REASONING_FAMILIES.iter().any(|family| model_lower.contains(family))
}

/// Build the middleware chain for `config`.
///
/// Order, outermost first: fence extraction, reasoning extraction, simulated
/// streaming. Reasoning tags are removed before fences are looked for, and
/// both extractors see the simulated stream.
pub fn build_auto_middlewares(config: &MiddlewareConfig) -> MiddlewareBuilder {
    let mut builder = MiddlewareBuilder::new();

    if config.extract_json {
        builder = builder.add(EXTRACT_JSON, Arc::new(ExtractJsonMiddleware::default()));
    }
    if config.enable_reasoning && is_reasoning_model(&config.model_id) {
        builder = builder.add(
            EXTRACT_REASONING,
            Arc::new(ExtractReasoningMiddleware::for_model(&config.model_id)),
        );
    }
    if config.simulate_streaming {
        builder = builder.add(SIMULATE_STREAMING, Arc::new(SimulateStreamingMiddleware::new()));
    }

    tracing::debug!(
        provider = %config.provider_id,
        model_id = %config.model_id,
        middlewares = ?builder.names(),
        "selected automatic middlewares"
    );
    builder
}

pub fn build_auto_middlewares_vec(
    provider_id: &str,
    model_id: &str,
) -> Vec<Arc<dyn LanguageModelMiddleware>> {
    build_auto_middlewares(&MiddlewareConfig::new(provider_id, model_id)).build()
}
