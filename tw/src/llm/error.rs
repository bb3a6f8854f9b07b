//! Completion adapter error types

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the completion adapter
///
/// Provider errors are kept distinct from empty/degenerate results: an empty
/// response body is not an `LlmError`, it shows up as `content: None` on the
/// response and the pipeline decides what to do with it.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
