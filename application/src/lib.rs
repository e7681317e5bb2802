//! Application layer for confab
//!
//! This crate defines the ports the chat client depends on (the model
//! transport, the tool executor, the schema converter, the event sink)
//! and the use case that orchestrates one conversation turn. Adapters for
//! the ports live in the infrastructure and presentation layers.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::GenerationParams;
pub use ports::event_sink::{ChatEventSink, NullChatEventSink};
pub use ports::llm_gateway::{GatewayError, LlmGateway};
pub use ports::tool_executor::ToolExecutorPort;
pub use ports::tool_schema::ToolSchemaPort;
pub use use_cases::chat_turn::ChatTurnUseCase;
