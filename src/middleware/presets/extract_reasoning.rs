//! Extract reasoning/thinking content from model responses.
//!
//! Some providers interleave chain-of-thought with the answer using XML-style
//! tags (`<think>`, `<thought>`, `<reasoning>`). This middleware moves the
//! tagged text onto the reasoning channel, for both call modes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::middleware::tag_extractor::{TagConfig, TagExtractor, extract_tagged_spans};
use crate::middleware::{CallNext, LanguageModelMiddleware};
use crate::streaming::{ChunkStream, StreamChunk, TextTransformStream, TextTransformer};
use crate::traits::LanguageModel;
use crate::types::{CallOptions, GenerateResult};

/// Preset reasoning tag configurations for different models.
pub struct ReasoningTagPresets;

impl ReasoningTagPresets {
    /// `<think>...</think>` tag (default, used by DeepSeek, Qwen, etc.)
    pub fn think() -> TagConfig {
        TagConfig::for_tag_name("think")
    }

    /// `<thought>...</thought>` tag (used by Gemini)
    pub fn thought() -> TagConfig {
        TagConfig::for_tag_name("thought")
    }

    /// `<reasoning>...</reasoning>` tag (used by gpt-oss)
    pub fn reasoning() -> TagConfig {
        TagConfig::for_tag_name("reasoning")
    }

    /// `<seed:think>...</seed:think>` tag (used by Seed models)
    pub fn seed_think() -> TagConfig {
        TagConfig::for_tag_name("seed:think")
    }

    /// `<thinking>...</thinking>` tag (generic)
    pub fn thinking() -> TagConfig {
        TagConfig::for_tag_name("thinking")
    }

    /// Pick a tag by model family; falls back to `<think>`.
    ///
    /// ```rust,ignore
    /// let config = ReasoningTagPresets::for_model("gemini-2.5-pro");
    /// assert_eq!(config.opening_tag, "<thought>");
    /// ```
    pub fn for_model(model_id: &str) -> TagConfig {
        let model_lower = model_id.to_lowercase();

        if model_lower.contains("gemini") {
            Self::thought()
        } else if model_lower.contains("seed-oss") || model_lower.contains("seed_oss") {
            Self::seed_think()
        } else if model_lower.contains("gpt-oss") || model_lower.contains("gpt_oss") {
            Self::reasoning()
        } else {
            Self::think()
        }
    }
}

/// Options for [`ExtractReasoningMiddleware`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractReasoningConfig {
    /// Tag name without angle brackets (`think` means `<think>...</think>`).
    pub tag_name: String,
    /// Joins multiple reasoning spans in single-shot results.
    pub separator: String,
    /// Treat the text as already inside an open tag.
    pub start_with_reasoning: bool,
}

impl Default for ExtractReasoningConfig {
    fn default() -> Self {
        Self {
            tag_name: "think".to_string(),
            separator: "\n".to_string(),
            start_with_reasoning: false,
        }
    }
}

impl ExtractReasoningConfig {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_start_with_reasoning(mut self, start: bool) -> Self {
        self.start_with_reasoning = start;
        self
    }

    pub fn tag_config(&self) -> TagConfig {
        TagConfig::for_tag_name(&self.tag_name).with_separator(self.separator.clone())
    }
}

/// Per-stream state: a tag extractor mapped onto text/reasoning chunks.
///
/// No separators are inserted on this path; spans are emitted as they close.
#[derive(Debug)]
pub struct ReasoningTagExtractor {
    inner: TagExtractor,
}

impl ReasoningTagExtractor {
    pub fn new(config: TagConfig, start_with_reasoning: bool) -> Self {
        Self {
            inner: TagExtractor::new(config).with_start_inside(start_with_reasoning),
        }
    }
}

impl TextTransformer for ReasoningTagExtractor {
    fn push(&mut self, text: &str, out: &mut Vec<StreamChunk>) {
        out.extend(self.inner.process_text(text).into_iter().map(|segment| {
            if segment.is_tag_content {
                StreamChunk::reasoning(segment.content)
            } else {
                StreamChunk::text(segment.content)
            }
        }));
    }

    fn flush(&mut self, out: &mut Vec<StreamChunk>) {
        if let Some(segment) = self.inner.finalize() {
            out.push(if segment.is_tag_content {
                StreamChunk::reasoning(segment.content)
            } else {
                StreamChunk::text(segment.content)
            });
        }
    }
}

/// Middleware moving tagged reasoning out of the text channel.
///
/// ```rust,ignore
/// let middleware = Arc::new(ExtractReasoningMiddleware::new(
///     ExtractReasoningConfig::new("think").with_separator("\n"),
/// ));
/// let model = wrap_language_model(base, vec![middleware], WrapOptions::new());
/// ```
#[derive(Debug, Clone)]
pub struct ExtractReasoningMiddleware {
    tag_config: TagConfig,
    start_with_reasoning: bool,
}

impl ExtractReasoningMiddleware {
    pub fn new(config: ExtractReasoningConfig) -> Self {
        Self {
            tag_config: config.tag_config(),
            start_with_reasoning: config.start_with_reasoning,
        }
    }

    /// Use literal tags instead of a tag name.
    pub fn with_tag(tag_config: TagConfig) -> Self {
        Self {
            tag_config,
            start_with_reasoning: false,
        }
    }

    pub fn for_model(model_id: &str) -> Self {
        Self::with_tag(ReasoningTagPresets::for_model(model_id))
    }

    pub fn starting_with_reasoning(mut self, start: bool) -> Self {
        self.start_with_reasoning = start;
        self
    }

    pub fn tag_config(&self) -> &TagConfig {
        &self.tag_config
    }

    /// Split a complete result's text into answer and reasoning.
    pub fn extract(&self, mut result: GenerateResult) -> GenerateResult {
        let extraction =
            extract_tagged_spans(&result.text, &self.tag_config, self.start_with_reasoning);
        let Some(extracted) = extraction.joined else {
            return result;
        };
        result.text = extraction.text;
        result.reasoning = Some(match result.reasoning.take() {
            Some(existing) if !existing.is_empty() => {
                format!("{existing}{}{extracted}", self.tag_config.separator)
            }
            _ => extracted,
        });
        result
    }
}

impl Default for ExtractReasoningMiddleware {
    fn default() -> Self {
        Self::new(ExtractReasoningConfig::default())
    }
}

#[async_trait]
impl LanguageModelMiddleware for ExtractReasoningMiddleware {
    async fn wrap_generate(
        &self,
        next: CallNext,
        _params: &CallOptions,
        _model: &Arc<dyn LanguageModel>,
    ) -> Result<GenerateResult, LlmError> {
        let result = next.generate().await?;
        Ok(self.extract(result))
    }

    async fn wrap_stream(
        &self,
        next: CallNext,
        _params: &CallOptions,
        _model: &Arc<dyn LanguageModel>,
    ) -> Result<ChunkStream, LlmError> {
        let upstream = next.stream().await?;
        let extractor =
            ReasoningTagExtractor::new(self.tag_config.clone(), self.start_with_reasoning);
        Ok(TextTransformStream::new(upstream, extractor).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_tag_presets() {
        let think = ReasoningTagPresets::think();
        assert_eq!(think.opening_tag, "<think>");
        assert_eq!(think.closing_tag, "</think>");

        let seed = ReasoningTagPresets::seed_think();
        assert_eq!(seed.opening_tag, "<seed:think>");
        assert_eq!(seed.closing_tag, "</seed:think>");
    }

    #[test]
    fn test_for_model() {
        assert_eq!(
            ReasoningTagPresets::for_model("gemini-2.5-pro").opening_tag,
            "<thought>"
        );
        assert_eq!(
            ReasoningTagPresets::for_model("Qwen3-32B").opening_tag,
            "<think>"
        );
        assert_eq!(
            ReasoningTagPresets::for_model("ByteDance-Seed/Seed-OSS-36B").opening_tag,
            "<seed:think>"
        );
        assert_eq!(
            ReasoningTagPresets::for_model("openai/gpt-oss-120b").opening_tag,
            "<reasoning>"
        );
        assert_eq!(
            ReasoningTagPresets::for_model("unknown").opening_tag,
            "<think>"
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ExtractReasoningConfig =
            serde_json::from_str(r#"{"tag_name":"thought"}"#).unwrap();
        assert_eq!(config.tag_name, "thought");
        assert_eq!(config.separator, "\n");
        assert!(!config.start_with_reasoning);
    }

    #[test]
    fn extract_sets_text_and_reasoning() {
        let mw = ExtractReasoningMiddleware::default();
        let out = mw.extract(GenerateResult::new(
            "Some text <think>reasoning here</think> more text",
        ));
        assert_eq!(out.text, "Some text \n more text");
        assert_eq!(out.reasoning.as_deref(), Some("reasoning here"));
    }

    #[test]
    fn extract_appends_to_provider_reasoning() {
        let mw = ExtractReasoningMiddleware::new(
            ExtractReasoningConfig::new("think").with_separator(" | "),
        );
        let out = mw.extract(GenerateResult::new("<think>b</think>answer").with_reasoning("a"));
        assert_eq!(out.reasoning.as_deref(), Some("a | b"));
        assert_eq!(out.text, "answer");
    }

    #[test]
    fn extract_without_tags_is_untouched() {
        let mw = ExtractReasoningMiddleware::default();
        let input = GenerateResult::new("plain answer");
        assert_eq!(mw.extract(input.clone()), input);
    }

    #[test]
    fn extractor_maps_segments_to_chunks() {
        let mut ex = ReasoningTagExtractor::new(ReasoningTagPresets::think(), false);
        let mut out = Vec::new();
        ex.push("hi <think>hm", &mut out);
        ex.push("m</think> ok", &mut out);
        ex.flush(&mut out);
        assert_eq!(
            out,
            vec![
                StreamChunk::text("hi "),
                StreamChunk::reasoning("hm"),
                StreamChunk::reasoning("m"),
                StreamChunk::text(" ok"),
            ]
        );
    }
}
