//! Completion adapter for TripWeaver
//!
//! Thin contract over the LLM completion service: prompt and context in,
//! text out. Retry policy for transient provider errors lives here, in the
//! adapter, never in the pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

mod anthropic;
mod error;
mod types;

pub use anthropic::AnthropicClient;
pub use error::LlmError;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Contract over the completion service
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion request to completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Create an LLM client based on the provider specified in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: anthropic",
            other
        ))),
    }
}
