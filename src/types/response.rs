//! Single-shot call results.

use serde::{Deserialize, Serialize};

use super::ToolCall;

/// Why the model stopped generating.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Model generated stop sequence or completed naturally.
    Stop,
    /// Model reached the maximum number of output tokens.
    Length,
    /// Model triggered tool/function calls.
    ToolCalls,
    /// Content was filtered due to safety/policy violations.
    ContentFilter,
    /// An error occurred during generation.
    Error,
    /// Other provider-specific finish reason.
    Other(String),
    /// The provider did not report a reason or it was not recognized.
    #[default]
    Unknown,
}

/// Token usage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u32>,
}

impl Usage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            reasoning_tokens: None,
        }
    }

    pub fn total_tokens(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Non-fatal notice attached to a result (e.g. an ignored setting).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Warning {
    UnsupportedSetting {
        setting: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    Other {
        message: String,
    },
}

/// Result of `do_generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateResult {
    /// Answer text. Empty when the model only produced tool calls.
    pub text: String,
    /// Reasoning text, either reported by the provider or extracted from
    /// in-band tags by `ExtractReasoningMiddleware`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    pub usage: Usage,
    pub finish_reason: FinishReason,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl GenerateResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: FinishReason::Stop,
            ..Default::default()
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = reason;
        self
    }

    pub fn has_reasoning(&self) -> bool {
        self.reasoning.as_deref().is_some_and(|r| !r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_total_saturates() {
        assert_eq!(Usage::new(3, 4).total_tokens(), 7);
        assert_eq!(Usage::new(u32::MAX, 1).total_tokens(), u32::MAX);
    }

    #[test]
    fn builder_sets_fields() {
        let r = GenerateResult::new("hi")
            .with_reasoning("because")
            .with_usage(Usage::new(1, 2))
            .with_finish_reason(FinishReason::Length);
        assert_eq!(r.text, "hi");
        assert!(r.has_reasoning());
        assert_eq!(r.usage.output_tokens, 2);
        assert_eq!(r.finish_reason, FinishReason::Length);
    }

    #[test]
    fn finish_reason_serializes_snake_case() {
        let v = serde_json::to_value(FinishReason::ToolCalls).unwrap();
        assert_eq!(v, serde_json::json!("tool_calls"));
    }
}
