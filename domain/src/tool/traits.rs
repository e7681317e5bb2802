//! Tool traits
//!
//! [`Tool`] is the capability contract every tool unit satisfies: describe
//! yourself, execute a call. [`ToolValidator`] is pure domain logic that
//! checks a call against a definition before execution.

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolResult;

/// A named, schema-described unit of local functionality
///
/// Implementations must not panic past this boundary: every expected
/// failure condition is converted into a failed [`ToolResult`].
pub trait Tool: Send + Sync {
    /// The tool's definition (name, description, parameters).
    /// Must be pure and side-effect free.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given call's arguments.
    fn execute(&self, call: &ToolCall) -> ToolResult;
}

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
///
/// Checks required parameters, rejects unknown parameters, and enforces
/// enumerated allowed values where a parameter declares them.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                ));
            }
        }

        for (arg_name, arg_value) in &call.arguments {
            let Some(param) = definition.parameter(arg_name) else {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            };

            if let (Some(allowed), Some(value)) = (&param.allowed_values, arg_value.as_str()) {
                if !allowed.iter().any(|a| a == value) {
                    return Err(format!(
                        "Invalid value '{}' for parameter '{}' of tool '{}' (allowed: {})",
                        value,
                        arg_name,
                        definition.name,
                        allowed.join(", ")
                    ));
                }
            }
        }

        Ok(())
    }
}
