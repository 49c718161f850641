//! Error handling types for lm-middleware.
//!
//! A single `LlmError` is shared by base models, middleware hooks and
//! streaming transformers. It is `Clone + PartialEq` so that it can travel
//! inside `StreamChunk::Error`.
//!
//! # Example
//!
//! ```rust,ignore
//! use lm_middleware::error::{ErrorCategory, LlmError};
//!
//! let error = LlmError::provider_error("mock", "upstream failed");
//! assert_eq!(error.category(), ErrorCategory::Provider);
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod types;

pub use types::*;
