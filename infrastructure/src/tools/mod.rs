//! Tool system
//!
//! The registry, the built-in tools (calculator, datetime, file
//! operations), manifest-based plugin tools, and the JSON-Schema converter.

pub mod calculator;
pub mod datetime;
pub mod file_ops;
pub mod plugins;
pub mod registry;
pub mod schema;

pub use calculator::CalculatorTool;
pub use datetime::DateTimeTool;
pub use file_ops::FileOperationsTool;
pub use plugins::load_plugin_tools;
pub use registry::{RegistryError, ToolRegistry};
pub use schema::JsonSchemaToolConverter;

use confab_domain::Tool;

/// The built-in tools, in their canonical registration order
pub fn builtin_tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(CalculatorTool),
        Box::new(DateTimeTool),
        Box::new(FileOperationsTool),
    ]
}
