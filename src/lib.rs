//! # lm-middleware
//!
//! Composable middleware for language models.
//!
#![deny(unsafe_code)]

//! A base model implements [`traits::LanguageModel`]; middleware implements
//! [`middleware::LanguageModelMiddleware`] (or is assembled from closures with
//! [`middleware::MiddlewareDescriptor`]). [`middleware::wrap_language_model`]
//! layers a list of middleware around the base model and returns another
//! `LanguageModel`, so wrapped models compose like any other.
//!
//! ## Streaming extractors
//!
//! - [`middleware::ExtractReasoningMiddleware`] moves `<think>...</think>`
//!   style spans out of the text channel into reasoning chunks.
//! - [`middleware::ExtractJsonMiddleware`] strips a ```` ```json ```` fence.
//!
//! Both produce the same output however the upstream text is split into
//! chunks, and both emit text progressively rather than at end-of-stream.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lm_middleware::prelude::*;
//! use std::sync::Arc;
//!
//! let model = wrap_language_model(
//!     base,
//!     vec![
//!         Arc::new(ExtractJsonMiddleware::default()),
//!         Arc::new(ExtractReasoningMiddleware::new(ExtractReasoningConfig::new("think"))),
//!     ],
//!     WrapOptions::new(),
//! );
//! let stream = model.do_stream(CallOptions::new(vec![PromptMessage::user("hi")])).await?;
//! let collected = collect_stream(stream).await?;
//! ```

pub mod error;
pub mod middleware;
pub mod streaming;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::LlmError;

/// Commonly used items.
pub mod prelude {
    pub use crate::error::{ErrorCategory, LlmError};
    pub use crate::middleware::{
        CallNext, ExtractJsonConfig, ExtractJsonMiddleware, ExtractReasoningConfig,
        ExtractReasoningMiddleware, LanguageModelMiddleware, MiddlewareBuilder,
        MiddlewareDescriptor, SimulateStreamingMiddleware, WrapOptions, wrap_language_model,
    };
    pub use crate::streaming::{ChunkStream, CollectedStream, StreamChunk, collect_stream};
    pub use crate::traits::{LanguageModel, ModelCapabilities};
    pub use crate::types::{
        CallOptions, CallType, FinishReason, GenerateResult, PromptMessage, ToolCall, Usage,
    };
}
