//! JSON Schema tool converter
//!
//! Default implementation of [`ToolSchemaPort`] producing the
//! chat-completions function format. Conversion preserves the order it is
//! given; the model sees tools in registration order.

use confab_application::ports::tool_schema::ToolSchemaPort;
use confab_domain::ToolDefinition;

/// Converter producing chat-completions `function` tool schemas.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"`, `"path"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
///
/// Enumerated allowed values become a JSON Schema `enum`.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "string" | "path" => "string",
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), serde_json::json!(schema_type));
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
            if let Some(values) = &param.allowed_values {
                prop.insert("enum".to_string(), serde_json::json!(values));
            }
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_domain::ToolParameter;

    #[test]
    fn test_tool_to_schema() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("file_operations", "Read files and list directories")
            .with_parameter(
                ToolParameter::new("operation", "Operation to perform", true)
                    .with_allowed_values(["read_file", "list_directory"]),
            )
            .with_parameter(ToolParameter::new("path", "File path", true).with_type("path"));

        let schema = converter.tool_to_schema(&tool);

        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "file_operations");
        assert_eq!(schema["function"]["parameters"]["type"], "object");

        // "path" maps to "string"
        let path_prop = &schema["function"]["parameters"]["properties"]["path"];
        assert_eq!(path_prop["type"], "string");

        // Allowed values become an enum
        let op_prop = &schema["function"]["parameters"]["properties"]["operation"];
        assert_eq!(
            op_prop["enum"],
            serde_json::json!(["read_file", "list_directory"])
        );

        let required = schema["function"]["parameters"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 2);
    }

    #[test]
    fn test_all_tools_schema_preserves_order() {
        let converter = JsonSchemaToolConverter;
        let definitions = vec![
            ToolDefinition::new("zeta", "Last registered first"),
            ToolDefinition::new("alpha", "Registered second"),
        ];

        let schemas = converter.all_tools_schema(&definitions);

        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas[0]["function"]["name"], "zeta");
        assert_eq!(schemas[1]["function"]["name"], "alpha");
    }

    #[test]
    fn test_parameterless_tool_has_empty_schema() {
        let converter = JsonSchemaToolConverter;
        let schema = converter.tool_to_schema(&ToolDefinition::new("ping", "No parameters"));

        assert_eq!(
            schema["function"]["parameters"]["properties"],
            serde_json::json!({})
        );
        assert_eq!(
            schema["function"]["parameters"]["required"],
            serde_json::json!([])
        );
    }
}
