//! Serve streaming calls from a single-shot call.
//!
//! For backends without native incremental support: `wrap_stream` ignores
//! the next layer's stream and replays its `do_generate` result as the
//! canonical chunk sequence.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::middleware::{CallNext, LanguageModelMiddleware};
use crate::streaming::{ChunkStream, SimulatedStream};
use crate::traits::LanguageModel;
use crate::types::CallOptions;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulateStreamingMiddleware;

impl SimulateStreamingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LanguageModelMiddleware for SimulateStreamingMiddleware {
    async fn wrap_stream(
        &self,
        next: CallNext,
        _params: &CallOptions,
        model: &Arc<dyn LanguageModel>,
    ) -> Result<ChunkStream, LlmError> {
        tracing::trace!(model_id = model.model_id(), "simulating stream from generate");
        let result = next.generate().await?;
        Ok(Box::pin(SimulatedStream::new(result)))
    }
}
