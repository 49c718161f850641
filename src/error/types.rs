//! Core error types.

use thiserror::Error;

/// Coarse classification used by callers deciding how to react to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller supplied something invalid (parameters, input, unsupported call).
    Client,
    /// The base model or its provider reported a failure.
    Provider,
    /// An incremental call failed mid-stream or timed out.
    Stream,
    /// A bug or broken invariant inside this crate or a middleware.
    Internal,
}

/// Unified error type for model calls and middleware hooks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LlmError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider error ({provider}): {message}")]
    ProviderError {
        provider: String,
        message: String,
        error_code: Option<String>,
    },

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl LlmError {
    /// Shorthand for a provider failure without an error code.
    pub fn provider_error(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.into(),
            message: message.into(),
            error_code: None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidParameter(_) | Self::InvalidInput(_) | Self::UnsupportedOperation(_) => {
                ErrorCategory::Client
            }
            Self::ProviderError { .. } | Self::JsonError(_) => ErrorCategory::Provider,
            Self::StreamError(_) | Self::TimeoutError(_) => ErrorCategory::Stream,
            Self::ProcessingError(_) | Self::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// Whether an outer retry layer may reasonably try the call again.
    ///
    /// Nothing in this crate retries; this is advisory for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StreamError(_) | Self::TimeoutError(_))
    }
}
