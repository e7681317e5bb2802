//! Tool Executor port
//!
//! Defines the interface for executing tools by name.

use async_trait::async_trait;
use confab_domain::{ToolCall, ToolDefinition, ToolResult};

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Definitions of all available tools, in registration order
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Names of all available tools, in registration order
    fn tool_names(&self) -> Vec<String> {
        self.definitions().into_iter().map(|d| d.name).collect()
    }

    /// Check whether any tools are available
    fn is_empty(&self) -> bool {
        self.definitions().is_empty()
    }

    /// Execute a tool call. Every failure path (unknown tool, invalid
    /// arguments, execution error) comes back as a failed [`ToolResult`],
    /// never as a panic.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
