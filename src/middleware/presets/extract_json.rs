//! Strip markdown code fences around JSON output.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::middleware::fence_extractor::{FenceExtractor, FenceTransform};
use crate::middleware::{CallNext, LanguageModelMiddleware};
use crate::streaming::{ChunkStream, TextTransformStream};
use crate::traits::LanguageModel;
use crate::types::{CallOptions, GenerateResult};

/// Options for [`ExtractJsonMiddleware`].
#[derive(Clone, Default)]
pub struct ExtractJsonConfig {
    /// Replaces the default fence stripping. With a custom transform,
    /// streamed text is buffered until the text span ends.
    pub transform: Option<FenceTransform>,
}

impl ExtractJsonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transform(
        mut self,
        transform: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }
}

impl std::fmt::Debug for ExtractJsonConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractJsonConfig")
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Middleware removing ```` ```json ```` fences from text output.
#[derive(Debug, Clone, Default)]
pub struct ExtractJsonMiddleware {
    config: ExtractJsonConfig,
}

impl ExtractJsonMiddleware {
    pub fn new(config: ExtractJsonConfig) -> Self {
        Self { config }
    }

    fn extractor(&self) -> FenceExtractor {
        FenceExtractor::new(self.config.transform.clone())
    }

    fn apply(&self, text: &str) -> String {
        self.extractor().transform_complete(text)
    }
}

#[async_trait]
impl LanguageModelMiddleware for ExtractJsonMiddleware {
    async fn wrap_generate(
        &self,
        next: CallNext,
        _params: &CallOptions,
        _model: &Arc<dyn LanguageModel>,
    ) -> Result<GenerateResult, LlmError> {
        let mut result = next.generate().await?;
        result.text = self.apply(&result.text);
        Ok(result)
    }

    async fn wrap_stream(
        &self,
        next: CallNext,
        _params: &CallOptions,
        _model: &Arc<dyn LanguageModel>,
    ) -> Result<ChunkStream, LlmError> {
        let upstream = next.stream().await?;
        Ok(TextTransformStream::new(upstream, self.extractor()).boxed())
    }
}
