//! Conversation domain model
//!
//! The append-only message history and the structured model response types.

pub mod entities;
pub mod response;

pub use entities::{ConversationHistory, Message, ToolCallRecord};
pub use response::{FinishReason, ModelResponse, ToolCallRequest};
