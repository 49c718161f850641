//! Core Streaming Types
//!
//! Defines the chunk union produced by incremental calls and the boxed
//! stream type every backend and wrapper returns.

use futures::Stream;
use std::pin::Pin;

use crate::error::LlmError;
use crate::types::{FinishReason, ToolCall, Usage};

/// One event of an incremental model response.
///
/// Ordering contract for a successful stream: all `Text`/`Reasoning` chunks
/// of a response come before its `Usage` chunk, and `Finish` is the final
/// chunk, preceded by `Usage`. `Error` is terminal wherever it appears.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Text { value: String },
    Reasoning { value: String },
    ToolCall { call: ToolCall },
    Usage { usage: Usage },
    Finish { reason: FinishReason, usage: Usage },
    Error { cause: LlmError },
}

impl StreamChunk {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    pub fn reasoning(value: impl Into<String>) -> Self {
        Self::Reasoning {
            value: value.into(),
        }
    }

    /// Short kind name, used in logs and ordering diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Reasoning { .. } => "reasoning",
            Self::ToolCall { .. } => "tool-call",
            Self::Usage { .. } => "usage",
            Self::Finish { .. } => "finish",
            Self::Error { .. } => "error",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value } => Some(value),
            _ => None,
        }
    }

    pub fn as_reasoning(&self) -> Option<&str> {
        match self {
            Self::Reasoning { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finish { .. } | Self::Error { .. })
    }
}

/// Chunk Stream - the incremental call result.
///
/// Pulling is driven by the caller (`StreamExt::next`). An `Err` item means
/// the stream terminated with an error. Dropping the stream closes it and
/// everything it wraps.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, LlmError>> + Send>>;
