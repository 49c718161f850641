//! Scripted language model for tests.
//!
//! Replays a fixed single-shot result and a fixed chunk script, and records
//! every call it receives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use lm_middleware::error::LlmError;
use lm_middleware::streaming::{ChunkStream, StreamChunk};
use lm_middleware::traits::{LanguageModel, ModelCapabilities};
use lm_middleware::types::{CallOptions, CallType, FinishReason, GenerateResult, Usage};

#[derive(Debug, Clone)]
pub struct MockLanguageModel {
    provider: String,
    model_id: String,
    result: Result<GenerateResult, LlmError>,
    script: Result<Vec<Result<StreamChunk, LlmError>>, LlmError>,
    calls: Arc<Mutex<Vec<(CallType, CallOptions)>>>,
}

impl Default for MockLanguageModel {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            model_id: "mock-model".to_string(),
            result: Ok(GenerateResult::new("mock response").with_usage(Usage::new(3, 2))),
            script: Ok(text_script(&["mock ", "response"])),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(mut self, provider: &str, model_id: &str) -> Self {
        self.provider = provider.to_string();
        self.model_id = model_id.to_string();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.result = Ok(GenerateResult::new(text).with_usage(Usage::new(3, 2)));
        self
    }

    pub fn with_result(mut self, result: GenerateResult) -> Self {
        self.result = Ok(result);
        self
    }

    pub fn with_generate_error(mut self, error: LlmError) -> Self {
        self.result = Err(error);
        self
    }

    /// Stream the given text fragments, then `Usage` and `Finish`.
    pub fn with_text_chunks(mut self, chunks: &[&str]) -> Self {
        self.script = Ok(text_script(chunks));
        self
    }

    pub fn with_script(mut self, items: Vec<Result<StreamChunk, LlmError>>) -> Self {
        self.script = Ok(items);
        self
    }

    /// Make `do_stream` itself fail.
    pub fn with_stream_error(mut self, error: LlmError) -> Self {
        self.script = Err(error);
        self
    }

    pub fn calls(&self) -> Vec<(CallType, CallOptions)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn into_model(self) -> Arc<dyn LanguageModel> {
        Arc::new(self)
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities::new().with_tools()
    }

    async fn do_generate(&self, params: CallOptions) -> Result<GenerateResult, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((CallType::Generate, params));
        self.result.clone()
    }

    async fn do_stream(&self, params: CallOptions) -> Result<ChunkStream, LlmError> {
        self.calls.lock().unwrap().push((CallType::Stream, params));
        let items = self.script.clone()?;
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

/// Text chunks followed by `Usage` and `Finish`.
pub fn text_script(chunks: &[&str]) -> Vec<Result<StreamChunk, LlmError>> {
    let usage = Usage::new(3, 2);
    let mut items: Vec<_> = chunks.iter().map(|c| Ok(StreamChunk::text(*c))).collect();
    items.push(Ok(StreamChunk::Usage { usage }));
    items.push(Ok(StreamChunk::Finish {
        reason: FinishReason::Stop,
        usage,
    }));
    items
}

/// Split `text` into consecutive pieces of the given char lengths; the
/// remainder becomes the last piece.
pub fn split_at_lengths(text: &str, lengths: &[usize]) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut pos = 0;
    for &len in lengths {
        if pos >= chars.len() {
            break;
        }
        let end = (pos + len).min(chars.len());
        pieces.push(chars[pos..end].iter().collect());
        pos = end;
    }
    if pos < chars.len() {
        pieces.push(chars[pos..].iter().collect());
    }
    pieces
}

pub fn text_values(chunks: &[StreamChunk]) -> Vec<&str> {
    chunks.iter().filter_map(StreamChunk::as_text).collect()
}

pub fn reasoning_values(chunks: &[StreamChunk]) -> Vec<&str> {
    chunks.iter().filter_map(StreamChunk::as_reasoning).collect()
}
