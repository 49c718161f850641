//! Middleware system
//!
//! Model-level middleware, the composition engine that layers it around a
//! base model, the streaming text extractors, and ready-made presets.

pub mod auto;
pub mod builder;
pub mod fence_extractor;
pub mod language_model;
pub mod named;
pub mod presets;
pub mod tag_extractor;
pub mod wrap;

pub use auto::{MiddlewareConfig, build_auto_middlewares, build_auto_middlewares_vec};
pub use builder::MiddlewareBuilder;
pub use fence_extractor::{FenceExtractor, FenceTransform, default_fence_transform};
pub use language_model::{
    CallNext, GenerateThunk, LanguageModelMiddleware, MiddlewareDescriptor, StreamThunk,
};
pub use named::NamedMiddleware;
pub use presets::{
    DefaultSettings, DefaultSettingsMiddleware, ExtractJsonConfig, ExtractJsonMiddleware,
    ExtractReasoningConfig, ExtractReasoningMiddleware, ReasoningTagExtractor,
    ReasoningTagPresets, SimulateStreamingMiddleware,
};
pub use tag_extractor::{TagConfig, TagExtractor, extract_tagged_spans, get_potential_start_index};
pub use wrap::{WrapOptions, WrappedLanguageModel, wrap_language_model};
