//! Tool domain model
//!
//! Entities, value objects, and traits for the tool system.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter};
pub use traits::{DefaultToolValidator, Tool, ToolValidator};
pub use value_objects::{ToolError, ToolResult};
