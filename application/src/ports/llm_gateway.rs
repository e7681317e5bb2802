//! LLM Gateway port
//!
//! Defines the interface for communicating with the model API. The gateway
//! is stateless: the full conversation history is sent with every request.

use crate::config::GenerationParams;
use async_trait::async_trait;
use confab_domain::{Message, ModelResponse};
use thiserror::Error;

/// Errors that can occur during gateway operations
///
/// Transport and API failures are distinguishable from a normal empty
/// response: an empty response is an `Ok(ModelResponse)` with no content.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited by the API")]
    RateLimited,

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Gateway for model communication
///
/// This port defines how the application layer talks to the model API.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send the conversation and get the model's response.
    ///
    /// `tools` is the model-facing tool list, sent verbatim. Callers pass
    /// `None` when no tools are registered; the adapter must then omit
    /// tool-calling from the request entirely, since some APIs reject an
    /// empty tool array.
    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[serde_json::Value]>,
        params: &GenerationParams,
    ) -> Result<ModelResponse, GatewayError>;
}
