//! Structured model responses
//!
//! A [`ModelResponse`] carries either assistant text or a sequence of
//! tool-call requests. Tool-call argument payloads stay as raw JSON text:
//! decoding them (and failing the turn on malformed payloads) is the
//! conversation loop's responsibility, not the transport's.

use serde::{Deserialize, Serialize};

/// A tool call requested by the model, as received from the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Identifier unique within the response, used to pair call and result
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Raw JSON text encoding the argument mapping
    pub arguments: String,
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of response
    Stop,
    /// The model wants to call tools
    ToolCalls,
    /// Hit the token limit — the response may be truncated
    MaxTokens,
    /// Provider-specific stop reason
    Other(String),
}

/// A structured response from the model
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// Assistant text, absent when the model requested tool calls
    pub text: Option<String>,
    /// Tool calls requested by the model, in model order
    pub tool_calls: Vec<ToolCallRequest>,
    /// Why the model stopped generating
    pub finish_reason: FinishReason,
}

impl ModelResponse {
    /// Create a text-only response
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
            finish_reason: FinishReason::Stop,
        }
    }

    /// Create a response requesting tool calls
    pub fn from_tool_calls(tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            text: None,
            tool_calls,
            finish_reason: FinishReason::ToolCalls,
        }
    }

    /// Returns `true` if the response contains any tool-call requests
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// The assistant text, empty when absent
    pub fn text_content(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
