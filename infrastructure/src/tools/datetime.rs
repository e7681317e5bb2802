//! DateTime tool
//!
//! Reports the current date and time in one of five formats. `iso` and
//! `timestamp` report UTC; the others report local time.

use chrono::{Local, Utc};
use confab_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};

pub const GET_DATETIME: &str = "get_datetime";

/// Allowed values for the `format` selector
const FORMATS: [&str; 5] = ["iso", "human", "timestamp", "date_only", "time_only"];

/// A tool for getting current date and time information
pub struct DateTimeTool;

impl Tool for DateTimeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            GET_DATETIME,
            "Get current date and time information in various formats",
        )
        .with_parameter(
            ToolParameter::new("format", "Format for the date/time output", false)
                .with_allowed_values(FORMATS),
        )
    }

    fn execute(&self, call: &ToolCall) -> ToolResult {
        let format = call.get_string("format").unwrap_or("human");

        let output = match format {
            "iso" => format!("Current time (UTC): {}", Utc::now().to_rfc3339()),
            "timestamp" => format!("Current timestamp: {}", Utc::now().timestamp()),
            "date_only" => format!("Current date: {}", Local::now().format("%Y-%m-%d")),
            "time_only" => format!("Current time: {}", Local::now().format("%H:%M:%S")),
            "human" => format!(
                "Current date and time: {}",
                Local::now().format("%A, %B %d, %Y at %I:%M:%S %p")
            ),
            other => {
                return ToolResult::failure(
                    GET_DATETIME,
                    ToolError::invalid_argument(format!(
                        "Unknown format '{}' (allowed: {})",
                        other,
                        FORMATS.join(", ")
                    )),
                );
            }
        };

        ToolResult::success(GET_DATETIME, output)
    }
}
