//! Language-model-level middleware
//!
//! A middleware intercepts calls to a `LanguageModel` through three
//! independent hooks: parameter transformation, single-shot wrapping and
//! incremental wrapping. Every hook defaults to pass-through, so an
//! implementation only overrides what it needs.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::LlmError;
use crate::streaming::ChunkStream;
use crate::traits::LanguageModel;
use crate::types::{CallOptions, CallType, GenerateResult};

/// Deferred single-shot call to the next layer.
pub type GenerateThunk =
    Arc<dyn Fn() -> BoxFuture<'static, Result<GenerateResult, LlmError>> + Send + Sync>;
/// Deferred incremental call to the next layer.
pub type StreamThunk =
    Arc<dyn Fn() -> BoxFuture<'static, Result<ChunkStream, LlmError>> + Send + Sync>;

/// The two ways of calling the next layer, already bound to the transformed
/// parameters.
///
/// Both are always supplied so a wrap hook can satisfy a streaming call with
/// a single-shot call or vice versa. Neither runs until invoked, and each can
/// be invoked more than once.
#[derive(Clone)]
pub struct CallNext {
    do_generate: GenerateThunk,
    do_stream: StreamThunk,
}

impl CallNext {
    /// Bind both thunks to `model` and `params`.
    pub fn new(model: Arc<dyn LanguageModel>, params: CallOptions) -> Self {
        let generate_model = model.clone();
        let generate_params = params.clone();
        let do_generate: GenerateThunk = Arc::new(move || {
            let model = generate_model.clone();
            let params = generate_params.clone();
            async move { model.do_generate(params).await }.boxed()
        });
        let do_stream: StreamThunk = Arc::new(move || {
            let model = model.clone();
            let params = params.clone();
            async move { model.do_stream(params).await }.boxed()
        });
        Self {
            do_generate,
            do_stream,
        }
    }

    /// Build from arbitrary thunks (useful when driving a hook directly).
    pub fn from_thunks(do_generate: GenerateThunk, do_stream: StreamThunk) -> Self {
        Self {
            do_generate,
            do_stream,
        }
    }

    pub async fn generate(&self) -> Result<GenerateResult, LlmError> {
        (self.do_generate)().await
    }

    pub async fn stream(&self) -> Result<ChunkStream, LlmError> {
        (self.do_stream)().await
    }
}

impl std::fmt::Debug for CallNext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallNext").finish_non_exhaustive()
    }
}

/// Model-level middleware.
///
/// `model` is always the layer directly beneath this middleware.
#[async_trait]
pub trait LanguageModelMiddleware: Send + Sync {
    /// Rewrite call parameters before anything else runs. An error aborts
    /// the call before the base model is reached.
    async fn transform_params(
        &self,
        _call_type: CallType,
        params: CallOptions,
        _model: &Arc<dyn LanguageModel>,
    ) -> Result<CallOptions, LlmError> {
        Ok(params)
    }

    /// Wrap a single-shot call. Default: call the next layer.
    async fn wrap_generate(
        &self,
        next: CallNext,
        _params: &CallOptions,
        _model: &Arc<dyn LanguageModel>,
    ) -> Result<GenerateResult, LlmError> {
        next.generate().await
    }

    /// Wrap an incremental call. Default: call the next layer.
    async fn wrap_stream(
        &self,
        next: CallNext,
        _params: &CallOptions,
        _model: &Arc<dyn LanguageModel>,
    ) -> Result<ChunkStream, LlmError> {
        next.stream().await
    }

    /// Optional provider override for the wrapped model.
    fn override_provider_id(&self, _model: &dyn LanguageModel) -> Option<String> {
        None
    }

    /// Optional model id override for the wrapped model.
    fn override_model_id(&self, _model: &dyn LanguageModel) -> Option<String> {
        None
    }
}

pub type TransformParamsFn = Arc<
    dyn Fn(
            CallType,
            CallOptions,
            Arc<dyn LanguageModel>,
        ) -> BoxFuture<'static, Result<CallOptions, LlmError>>
        + Send
        + Sync,
>;
pub type WrapGenerateFn = Arc<
    dyn Fn(
            CallNext,
            CallOptions,
            Arc<dyn LanguageModel>,
        ) -> BoxFuture<'static, Result<GenerateResult, LlmError>>
        + Send
        + Sync,
>;
pub type WrapStreamFn = Arc<
    dyn Fn(
            CallNext,
            CallOptions,
            Arc<dyn LanguageModel>,
        ) -> BoxFuture<'static, Result<ChunkStream, LlmError>>
        + Send
        + Sync,
>;
pub type OverrideFn = Arc<dyn Fn(&dyn LanguageModel) -> String + Send + Sync>;

/// Closure-based middleware: a bundle of optional hooks.
///
/// An absent hook is an explicit pass-through. Immutable once built and
/// reusable across any number of calls.
///
/// # Example
///
/// ```rust,ignore
/// let mw = MiddlewareDescriptor::new()
///     .with_transform_params(|_call, mut params, _model| async move {
///         params.temperature.get_or_insert(0.2);
///         Ok(params)
///     });
/// ```
#[derive(Clone, Default)]
pub struct MiddlewareDescriptor {
    pub transform_params: Option<TransformParamsFn>,
    pub wrap_generate: Option<WrapGenerateFn>,
    pub wrap_stream: Option<WrapStreamFn>,
    pub override_provider_id: Option<OverrideFn>,
    pub override_model_id: Option<OverrideFn>,
}

impl MiddlewareDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transform_params<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(CallType, CallOptions, Arc<dyn LanguageModel>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallOptions, LlmError>> + Send + 'static,
    {
        self.transform_params = Some(Arc::new(
            move |call_type: CallType, params: CallOptions, model: Arc<dyn LanguageModel>| {
                f(call_type, params, model).boxed()
            },
        ));
        self
    }

    pub fn with_wrap_generate<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(CallNext, CallOptions, Arc<dyn LanguageModel>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GenerateResult, LlmError>> + Send + 'static,
    {
        self.wrap_generate = Some(Arc::new(
            move |next: CallNext, params: CallOptions, model: Arc<dyn LanguageModel>| {
                f(next, params, model).boxed()
            },
        ));
        self
    }

    pub fn with_wrap_stream<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(CallNext, CallOptions, Arc<dyn LanguageModel>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ChunkStream, LlmError>> + Send + 'static,
    {
        self.wrap_stream = Some(Arc::new(
            move |next: CallNext, params: CallOptions, model: Arc<dyn LanguageModel>| {
                f(next, params, model).boxed()
            },
        ));
        self
    }

    pub fn with_provider_id(
        mut self,
        f: impl Fn(&dyn LanguageModel) -> String + Send + Sync + 'static,
    ) -> Self {
        self.override_provider_id = Some(Arc::new(f));
        self
    }

    pub fn with_model_id(
        mut self,
        f: impl Fn(&dyn LanguageModel) -> String + Send + Sync + 'static,
    ) -> Self {
        self.override_model_id = Some(Arc::new(f));
        self
    }
}

impl std::fmt::Debug for MiddlewareDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareDescriptor")
            .field("transform_params", &self.transform_params.is_some())
            .field("wrap_generate", &self.wrap_generate.is_some())
            .field("wrap_stream", &self.wrap_stream.is_some())
            .field("override_provider_id", &self.override_provider_id.is_some())
            .field("override_model_id", &self.override_model_id.is_some())
            .finish()
    }
}

#[async_trait]
impl LanguageModelMiddleware for MiddlewareDescriptor {
    async fn transform_params(
        &self,
        call_type: CallType,
        params: CallOptions,
        model: &Arc<dyn LanguageModel>,
    ) -> Result<CallOptions, LlmError> {
        match &self.transform_params {
            Some(f) => f(call_type, params, model.clone()).await,
            None => Ok(params),
        }
    }

    async fn wrap_generate(
        &self,
        next: CallNext,
        params: &CallOptions,
        model: &Arc<dyn LanguageModel>,
    ) -> Result<GenerateResult, LlmError> {
        match &self.wrap_generate {
            Some(f) => f(next, params.clone(), model.clone()).await,
            None => next.generate().await,
        }
    }

    async fn wrap_stream(
        &self,
        next: CallNext,
        params: &CallOptions,
        model: &Arc<dyn LanguageModel>,
    ) -> Result<ChunkStream, LlmError> {
        match &self.wrap_stream {
            Some(f) => f(next, params.clone(), model.clone()).await,
            None => next.stream().await,
        }
    }

    fn override_provider_id(&self, model: &dyn LanguageModel) -> Option<String> {
        self.override_provider_id.as_ref().map(|f| f(model))
    }

    fn override_model_id(&self, model: &dyn LanguageModel) -> Option<String> {
        self.override_model_id.as_ref().map(|f| f(model))
    }
}

static_assertions::assert_impl_all!(MiddlewareDescriptor: Send, Sync);
static_assertions::assert_impl_all!(CallNext: Send, Sync);
