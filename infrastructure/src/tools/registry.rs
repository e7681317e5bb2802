//! Tool Registry
//!
//! The [`ToolRegistry`] owns every registered tool and implements
//! [`ToolExecutorPort`]. It is the outer safety net of the tool system:
//! lookup failures and invalid arguments come back as failed results, and
//! no tool failure crosses the registry boundary as anything else.
//!
//! # Semantics
//!
//! - Registration is keyed by the tool's definition name. Registering a
//!   name that is already present overwrites the prior entry (last write
//!   wins, no error); the entry keeps its original position.
//! - Enumeration order is registration order.
//! - The registry never shrinks during a session.

use std::sync::Arc;

use async_trait::async_trait;
use confab_application::ports::event_sink::ChatEventSink;
use confab_application::ports::tool_executor::ToolExecutorPort;
use confab_domain::{
    DefaultToolValidator, Tool, ToolCall, ToolDefinition, ToolError, ToolResult, ToolValidator,
};
use indexmap::IndexMap;
use thiserror::Error;

/// Error type for registry lookups
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Tool '{0}' is not registered")]
    NotFound(String),
}

/// Registry mapping tool names to tool instances
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn Tool>>,
    sink: Arc<dyn ChatEventSink>,
}

impl ToolRegistry {
    /// Create a new empty registry with the given notification sink
    pub fn new(sink: Arc<dyn ChatEventSink>) -> Self {
        Self {
            tools: IndexMap::new(),
            sink,
        }
    }

    /// Register a tool, overwriting any prior tool with the same name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.definition().name;
        tracing::debug!(tool = %name, "Registered tool");
        self.sink.tool_registered(&name);
        self.tools.insert(name, tool);
    }

    /// Register every tool in the iterator, in order
    pub fn register_all(&mut self, tools: impl IntoIterator<Item = Box<dyn Tool>>) {
        for tool in tools {
            self.register(tool);
        }
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Result<&dyn Tool, RegistryError> {
        self.tools
            .get(name)
            .map(Box::as_ref)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Names of all registered tools, in registration order
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call.
    ///
    /// Lookup failure becomes a `NOT_FOUND` result, invalid arguments an
    /// `INVALID_ARGUMENT` result; otherwise the tool runs and its own
    /// result is returned.
    pub fn execute(&self, call: &ToolCall) -> ToolResult {
        let tool = match self.get(&call.tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                return ToolResult::failure(&call.tool_name, ToolError::new("NOT_FOUND", e.to_string()));
            }
        };

        let definition = tool.definition();
        if let Err(message) = DefaultToolValidator.validate(call, &definition) {
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message));
        }

        tool.execute(call)
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        ToolRegistry::execute(self, call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_application::ports::event_sink::NullChatEventSink;
    use confab_domain::ToolParameter;

    struct EchoTool {
        name: &'static str,
        reply: &'static str,
    }

    impl Tool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name, "Echoes a fixed reply")
                .with_parameter(ToolParameter::new("message", "Message to echo", true))
        }

        fn execute(&self, _call: &ToolCall) -> ToolResult {
            ToolResult::success(self.name, self.reply)
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(NullChatEventSink))
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let mut registry = registry();
        registry.register(Box::new(EchoTool { name: "beta", reply: "b" }));
        registry.register(Box::new(EchoTool { name: "alpha", reply: "a" }));

        assert_eq!(registry.tool_names(), vec!["beta", "alpha"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_overwrite_keeps_one_entry_with_second_behavior() {
        let mut registry = registry();
        registry.register(Box::new(EchoTool { name: "echo", reply: "first" }));
        registry.register(Box::new(EchoTool { name: "other", reply: "x" }));
        registry.register(Box::new(EchoTool { name: "echo", reply: "second" }));

        // One entry, original position, second tool's behavior.
        assert_eq!(registry.tool_names(), vec!["echo", "other"]);
        let call = ToolCall::new("echo").with_arg("message", "hi");
        let result = registry.execute(&call);
        assert_eq!(result.output(), Some("second"));
    }

    #[test]
    fn test_get_unknown_tool_fails() {
        let registry = registry();
        let err = match registry.get("missing") {
            Ok(_) => panic!("expected lookup to fail"),
            Err(e) => e,
        };
        assert!(matches!(err, RegistryError::NotFound(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_execute_unknown_tool_returns_failure_result() {
        let registry = registry();
        let result = registry.execute(&ToolCall::new("missing"));

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }

    #[test]
    fn test_execute_validates_arguments() {
        let mut registry = registry();
        registry.register(Box::new(EchoTool { name: "echo", reply: "hi" }));

        // Missing required parameter
        let result = registry.execute(&ToolCall::new("echo"));
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");

        // Unknown parameter
        let call = ToolCall::new("echo")
            .with_arg("message", "hi")
            .with_arg("bogus", "x");
        let result = registry.execute(&call);
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_executor_port_definitions_in_order() {
        let mut registry = registry();
        registry.register_all(crate::tools::builtin_tools());

        let names: Vec<String> = ToolExecutorPort::definitions(&registry)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["calculate", "get_datetime", "file_operations"]);
    }

    #[tokio::test]
    async fn test_builtin_tools_through_registry() {
        let mut registry = registry();
        registry.register_all(crate::tools::builtin_tools());

        let call = ToolCall::new("calculate").with_arg("expression", "2 + 3 * 4");
        let result = ToolExecutorPort::execute(&registry, &call).await;
        assert!(result.is_success());
        assert!(result.output().unwrap().contains("14"));

        let call = ToolCall::new("calculate").with_arg("expression", "1/0");
        let result = ToolExecutorPort::execute(&registry, &call).await;
        assert_eq!(result.error().unwrap().code, "DIVISION_BY_ZERO");

        let call = ToolCall::new("get_datetime").with_arg("format", "timestamp");
        let result = ToolExecutorPort::execute(&registry, &call).await;
        let seconds: i64 = result
            .output()
            .unwrap()
            .strip_prefix("Current timestamp: ")
            .unwrap()
            .parse()
            .unwrap();
        assert!(seconds > 0);

        let call = ToolCall::new("file_operations")
            .with_arg("operation", "read_file")
            .with_arg("path", "/no/such/file.txt");
        let result = ToolExecutorPort::execute(&registry, &call).await;
        assert!(!result.is_success());
        assert!(result.error().unwrap().message.contains("does not exist"));
    }
}
