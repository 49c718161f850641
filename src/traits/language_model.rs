//! Language model capability trait

use async_trait::async_trait;

use super::ModelCapabilities;
use crate::error::LlmError;
use crate::streaming::ChunkStream;
use crate::types::{CallOptions, GenerateResult};

/// The contract shared by concrete backends and middleware-wrapped models.
///
/// Implementations hold no per-call mutable state, so one handle can serve
/// many concurrent calls. Handles are passed around as `Arc<dyn LanguageModel>`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider name (e.g. "openai").
    fn provider(&self) -> &str;

    /// Provider-specific model id.
    fn model_id(&self) -> &str;

    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities::default()
    }

    /// Single-shot call.
    async fn do_generate(&self, params: CallOptions) -> Result<GenerateResult, LlmError>;

    /// Incremental call. The returned stream is lazy: nothing is pulled
    /// until the caller polls it.
    async fn do_stream(&self, params: CallOptions) -> Result<ChunkStream, LlmError>;
}

impl std::fmt::Debug for dyn LanguageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageModel")
            .field("provider", &self.provider())
            .field("model_id", &self.model_id())
            .finish()
    }
}
