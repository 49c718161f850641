//! Model composition: layering middleware around a base model.
//!
//! `wrap_language_model(base, [A, B])` builds `A(B(base))`: `A` transforms
//! parameters first and its wrap hooks run outermost, `B` sits directly on
//! the base model.

use std::sync::Arc;

use async_trait::async_trait;

use super::{CallNext, LanguageModelMiddleware};
use crate::error::LlmError;
use crate::streaming::ChunkStream;
use crate::traits::{LanguageModel, ModelCapabilities};
use crate::types::{CallOptions, CallType, GenerateResult};

/// Explicit metadata overrides applied to every layer of a composition.
#[derive(Debug, Clone, Default)]
pub struct WrapOptions {
    pub model_id: Option<String>,
    pub provider_id: Option<String>,
}

impl WrapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_provider_id(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }
}

/// Compose `middlewares` around `model`.
///
/// An empty list returns `model` itself (same `Arc`), so callers can detect
/// "no wrapping" with `Arc::ptr_eq`.
pub fn wrap_language_model(
    model: Arc<dyn LanguageModel>,
    middlewares: Vec<Arc<dyn LanguageModelMiddleware>>,
    options: WrapOptions,
) -> Arc<dyn LanguageModel> {
    if middlewares.is_empty() {
        return model;
    }
    let layers = middlewares.len();
    let wrapped = middlewares
        .into_iter()
        .rev()
        .fold(model, |inner, middleware| {
            Arc::new(WrappedLanguageModel::new(inner, middleware, &options))
                as Arc<dyn LanguageModel>
        });
    tracing::debug!(
        layers,
        provider = wrapped.provider(),
        model_id = wrapped.model_id(),
        "composed language model"
    );
    wrapped
}

/// One middleware layer over an inner model.
///
/// Metadata is resolved once at construction: explicit override, then the
/// middleware's override, then the inner model's value.
pub struct WrappedLanguageModel {
    inner: Arc<dyn LanguageModel>,
    middleware: Arc<dyn LanguageModelMiddleware>,
    provider: String,
    model_id: String,
}

impl WrappedLanguageModel {
    pub fn new(
        inner: Arc<dyn LanguageModel>,
        middleware: Arc<dyn LanguageModelMiddleware>,
        options: &WrapOptions,
    ) -> Self {
        let provider = options
            .provider_id
            .clone()
            .or_else(|| middleware.override_provider_id(inner.as_ref()))
            .unwrap_or_else(|| inner.provider().to_string());
        let model_id = options
            .model_id
            .clone()
            .or_else(|| middleware.override_model_id(inner.as_ref()))
            .unwrap_or_else(|| inner.model_id().to_string());
        Self {
            inner,
            middleware,
            provider,
            model_id,
        }
    }

    pub fn inner(&self) -> &Arc<dyn LanguageModel> {
        &self.inner
    }

    async fn prepare(
        &self,
        call_type: CallType,
        params: CallOptions,
    ) -> Result<CallOptions, LlmError> {
        self.middleware
            .transform_params(call_type, params, &self.inner)
            .await
            .inspect_err(|e| {
                tracing::debug!(call_type = %call_type, error = %e, "transform_params failed");
            })
    }
}

#[async_trait]
impl LanguageModel for WrappedLanguageModel {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn capabilities(&self) -> ModelCapabilities {
        self.inner.capabilities()
    }

    async fn do_generate(&self, params: CallOptions) -> Result<GenerateResult, LlmError> {
        let params = self.prepare(CallType::Generate, params).await?;
        let next = CallNext::new(self.inner.clone(), params.clone());
        self.middleware
            .wrap_generate(next, &params, &self.inner)
            .await
    }

    async fn do_stream(&self, params: CallOptions) -> Result<ChunkStream, LlmError> {
        let params = self.prepare(CallType::Stream, params).await?;
        let next = CallNext::new(self.inner.clone(), params.clone());
        self.middleware.wrap_stream(next, &params, &self.inner).await
    }
}

impl std::fmt::Debug for WrappedLanguageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedLanguageModel")
            .field("provider", &self.provider)
            .field("model_id", &self.model_id)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(WrappedLanguageModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::MiddlewareDescriptor;
    use crate::streaming::StreamChunk;
    use tracing_test::traced_test;

    struct Base;

    #[async_trait]
    impl LanguageModel for Base {
        fn provider(&self) -> &str {
            "base-provider"
        }
        fn model_id(&self) -> &str {
            "base-model"
        }
        async fn do_generate(&self, _params: CallOptions) -> Result<GenerateResult, LlmError> {
            Ok(GenerateResult::new("base"))
        }
        async fn do_stream(&self, _params: CallOptions) -> Result<ChunkStream, LlmError> {
            Ok(Box::pin(futures::stream::iter(vec![Ok(StreamChunk::text(
                "base",
            ))])))
        }
    }

    fn overriding(
        provider: &'static str,
        model: &'static str,
    ) -> Arc<dyn LanguageModelMiddleware> {
        Arc::new(
            MiddlewareDescriptor::new()
                .with_provider_id(move |_| provider.to_string())
                .with_model_id(move |_| model.to_string()),
        )
    }

    #[test]
    fn empty_list_is_identity() {
        let base: Arc<dyn LanguageModel> = Arc::new(Base);
        let out = wrap_language_model(base.clone(), vec![], WrapOptions::new());
        assert!(Arc::ptr_eq(&base, &out));
    }

    #[test]
    fn metadata_defaults_to_inner() {
        let base: Arc<dyn LanguageModel> = Arc::new(Base);
        let out = wrap_language_model(
            base,
            vec![Arc::new(MiddlewareDescriptor::new())],
            WrapOptions::new(),
        );
        assert_eq!(out.provider(), "base-provider");
        assert_eq!(out.model_id(), "base-model");
    }

    #[test]
    fn middleware_override_beats_inner_and_outer_wins() {
        let base: Arc<dyn LanguageModel> = Arc::new(Base);
        let out = wrap_language_model(
            base,
            vec![overriding("outer-p", "outer-m"), overriding("inner-p", "inner-m")],
            WrapOptions::new(),
        );
        assert_eq!(out.provider(), "outer-p");
        assert_eq!(out.model_id(), "outer-m");
    }

    #[test]
    fn explicit_override_beats_middleware() {
        let base: Arc<dyn LanguageModel> = Arc::new(Base);
        let out = wrap_language_model(
            base,
            vec![overriding("mw-p", "mw-m")],
            WrapOptions::new().with_model_id("explicit-m"),
        );
        assert_eq!(out.model_id(), "explicit-m");
        // Provider precedence is resolved independently.
        assert_eq!(out.provider(), "mw-p");
    }

    #[tokio::test]
    #[traced_test]
    async fn transform_failure_is_returned_and_logged() {
        let failing = Arc::new(MiddlewareDescriptor::new().with_transform_params(
            |_call_type, _params, _model| async move {
                Err(LlmError::InvalidInput("empty prompt".into()))
            },
        ));
        let out = wrap_language_model(Arc::new(Base), vec![failing], WrapOptions::new());
        let err = out.do_generate(CallOptions::default()).await.unwrap_err();
        assert_eq!(err, LlmError::InvalidInput("empty prompt".into()));
        assert!(logs_contain("transform_params failed"));
    }
}
