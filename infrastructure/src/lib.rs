//! Infrastructure layer for confab
//!
//! Adapters for the application-layer ports: the OpenAI-compatible HTTP
//! gateway, the tool registry with its built-in and plugin tools, the
//! JSON-Schema converter, and configuration loading.

pub mod config;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ChatConfig, ConfigError, ConfigLoader};
pub use providers::OpenAiGateway;
pub use tools::{
    builtin_tools, load_plugin_tools, JsonSchemaToolConverter, RegistryError, ToolRegistry,
};
