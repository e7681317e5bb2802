//! Domain layer for confab
//!
//! This crate contains the core entities and value objects of the chat
//! client. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Tool
//!
//! A [`Tool`](tool::Tool) is a named, schema-described unit of local
//! functionality the model can invoke. Tools describe themselves through a
//! [`ToolDefinition`](tool::ToolDefinition) and execute against a
//! [`ToolCall`](tool::ToolCall), always producing a
//! [`ToolResult`](tool::ToolResult), never a panic.
//!
//! ## Conversation
//!
//! A [`ConversationHistory`](conversation::ConversationHistory) is the
//! ordered, append-only log of all messages in a session, sent in full with
//! every model request.

pub mod conversation;
pub mod tool;

// Re-export commonly used types
pub use conversation::{
    entities::{ConversationHistory, Message, ToolCallRecord},
    response::{FinishReason, ModelResponse, ToolCallRequest},
};
pub use tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    traits::{DefaultToolValidator, Tool, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
