//! Error types for the WebScout domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all WebScout operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Structured output errors ---
    #[error("Structured output error: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// The model did not honour a forced function call.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("Model returned no tool call for `{function}`")]
    NoToolCall { function: String },

    #[error("Arguments for `{function}` are not a JSON object: {reason}")]
    InvalidArguments { function: String, reason: String },

    #[error("Arguments for `{function}` are missing string field `{field}`")]
    MissingField { function: String, field: String },
}
