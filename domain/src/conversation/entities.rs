//! Conversation entities
//!
//! A conversation is an ordered, append-only sequence of [`Message`]
//! entries. The full history is sent with every model request; no entry is
//! removed or mutated after being appended.

use serde::{Deserialize, Serialize};

/// A tool call as transcribed into the history
///
/// The argument payload is kept as the raw JSON text the model produced,
/// so the history round-trips to the wire format unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// API-assigned identifier, referenced by the paired tool message
    pub id: String,
    /// Name of the tool invoked
    pub name: String,
    /// Raw JSON argument text
    pub arguments: String,
}

/// A message in a conversation
///
/// Assistant messages carry either plain text or tool calls, never both:
/// the variants make the exclusivity structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// Static instruction text, always first, set once at session start
    System { content: String },
    /// User-submitted text
    User { content: String },
    /// Model output: plain text, or a request to call tools
    Assistant {
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRecord>,
    },
    /// Result of one tool call, paired with the preceding assistant
    /// tool-call record by id
    Tool {
        tool_call_id: String,
        tool_name: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant_tool_call(record: ToolCallRecord) -> Self {
        Message::Assistant {
            content: None,
            tool_calls: vec![record],
        }
    }

    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Message::Tool {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            content: content.into(),
        }
    }
}

/// Ordered, append-only conversation history
///
/// Grows monotonically for the life of the process. The system message is
/// set once at construction and stays first.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    /// Create a history seeded with the system instruction
    pub fn with_system_prompt(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Create an empty history (no system instruction)
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Append the transcription of one executed tool call: the assistant
    /// request and its paired result, in order.
    pub fn push_tool_exchange(&mut self, record: ToolCallRecord, result_content: impl Into<String>) {
        let (id, name) = (record.id.clone(), record.name.clone());
        self.messages.push(Message::assistant_tool_call(record));
        self.messages.push(Message::tool_result(id, name, result_content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}
