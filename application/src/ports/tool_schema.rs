//! Tool schema conversion port
//!
//! Separates "which tools exist" (domain) from "how to serialize them for
//! the API" (infrastructure). The conversion preserves the order it is
//! given: the exported list is the registry's registration order.

use confab_domain::ToolDefinition;

/// Port for converting tool definitions to the model API's schema format
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to the wire schema
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert a list of definitions, preserving order
    fn all_tools_schema(&self, definitions: &[ToolDefinition]) -> Vec<serde_json::Value> {
        definitions.iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
