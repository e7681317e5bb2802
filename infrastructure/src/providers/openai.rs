//! OpenAI-compatible gateway adapter
//!
//! Works with OpenAI and any other service implementing the chat
//! completions API. The adapter is stateless: every request carries the
//! full conversation history.

use async_trait::async_trait;
use confab_application::config::GenerationParams;
use confab_application::ports::llm_gateway::{GatewayError, LlmGateway};
use confab_domain::{FinishReason, Message, ModelResponse, ToolCallRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Timeout for a single completion request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// OpenAI-compatible gateway
pub struct OpenAiGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiGateway {
    /// Create a new gateway.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.openai.com/v1").
    /// * `api_key` - Bearer token for authentication.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[serde_json::Value]>,
        params: &GenerationParams,
    ) -> Result<ModelResponse, GatewayError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let request = ChatRequest {
            model: params.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            // None means the field is omitted entirely; some compatible
            // APIs reject an empty tools array.
            tools: tools.map(<[serde_json::Value]>::to_vec),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        debug!(
            model = %params.model,
            message_count = messages.len(),
            has_tools = tools.is_some(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(GatewayError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        convert_response(chat_response)
    }
}

/// Convert the wire response into the domain model response
fn convert_response(response: ChatResponse) -> Result<ModelResponse, GatewayError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::InvalidResponse("No choices in response".to_string()))?;

    let tool_calls: Vec<ToolCallRequest> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCallRequest {
            id: tc.id,
            name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect();

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("tool_calls") => FinishReason::ToolCalls,
        Some("length") => FinishReason::MaxTokens,
        Some("stop") | None => {
            if tool_calls.is_empty() {
                FinishReason::Stop
            } else {
                FinishReason::ToolCalls
            }
        }
        Some(other) => FinishReason::Other(other.to_string()),
    };

    Ok(ModelResponse {
        text: choice.message.content,
        tool_calls,
        finish_reason,
    })
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireToolCall {
    id: String,
    r#type: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize)]
struct WireFunctionCall {
    name: String,
    /// Raw JSON argument text, exactly as the model produced it
    arguments: String,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        match message {
            Message::System { content } => WireMessage {
                role: "system",
                content: Some(content.clone()),
                tool_calls: None,
                tool_call_id: None,
                name: None,
            },
            Message::User { content } => WireMessage {
                role: "user",
                content: Some(content.clone()),
                tool_calls: None,
                tool_call_id: None,
                name: None,
            },
            Message::Assistant {
                content,
                tool_calls,
            } => WireMessage {
                role: "assistant",
                content: content.clone(),
                tool_calls: if tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        tool_calls
                            .iter()
                            .map(|tc| WireToolCall {
                                id: tc.id.clone(),
                                r#type: "function".to_string(),
                                function: WireFunctionCall {
                                    name: tc.name.clone(),
                                    arguments: tc.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                },
                tool_call_id: None,
                name: None,
            },
            Message::Tool {
                tool_call_id,
                tool_name,
                content,
            } => WireMessage {
                role: "tool",
                content: Some(content.clone()),
                tool_calls: None,
                tool_call_id: Some(tool_call_id.clone()),
                name: Some(tool_name.clone()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    id: String,
    function: ResponseFunctionCall,
}

#[derive(Debug, Deserialize)]
struct ResponseFunctionCall {
    name: String,
    arguments: String,
}
