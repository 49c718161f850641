//! Ready-made middlewares.

pub mod default_settings;
pub mod extract_json;
pub mod extract_reasoning;
pub mod simulate_streaming;

pub use default_settings::{DefaultSettings, DefaultSettingsMiddleware};
pub use extract_json::{ExtractJsonConfig, ExtractJsonMiddleware};
pub use extract_reasoning::{
    ExtractReasoningConfig, ExtractReasoningMiddleware, ReasoningTagExtractor, ReasoningTagPresets,
};
pub use simulate_streaming::SimulateStreamingMiddleware;
