//! File operations tool
//!
//! Reads files and lists directories. Runs with the host process's
//! privileges; there is no sandboxing beyond argument validation, so every
//! failure mode maps to a distinct, descriptive error result.

use confab_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use std::fs;
use std::path::Path;

pub const FILE_OPERATIONS: &str = "file_operations";

/// Maximum file size to read (10 MiB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// A tool for reading files and listing directory contents
pub struct FileOperationsTool;

impl Tool for FileOperationsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            FILE_OPERATIONS,
            "Perform file operations like reading file contents or listing directory contents",
        )
        .with_parameter(
            ToolParameter::new("operation", "Operation to perform", true)
                .with_allowed_values(["read_file", "list_directory"]),
        )
        .with_parameter(
            ToolParameter::new("path", "File or directory path", true).with_type("path"),
        )
    }

    fn execute(&self, call: &ToolCall) -> ToolResult {
        let operation = match call.require_string("operation") {
            Ok(op) => op,
            Err(message) => {
                return ToolResult::failure(FILE_OPERATIONS, ToolError::invalid_argument(message));
            }
        };
        let path = match call.require_string("path") {
            Ok(p) => p,
            Err(message) => {
                return ToolResult::failure(FILE_OPERATIONS, ToolError::invalid_argument(message));
            }
        };

        match operation {
            "read_file" => read_file(path),
            "list_directory" => list_directory(path),
            other => ToolResult::failure(
                FILE_OPERATIONS,
                ToolError::invalid_argument(format!("Unknown operation '{}'", other)),
            ),
        }
    }
}

fn read_file(path_str: &str) -> ToolResult {
    let path = Path::new(path_str);

    if !path.exists() {
        return ToolResult::failure(
            FILE_OPERATIONS,
            ToolError::new("NOT_FOUND", format!("File '{}' does not exist", path_str)),
        );
    }

    if !path.is_file() {
        return ToolResult::failure(
            FILE_OPERATIONS,
            ToolError::invalid_argument(format!("'{}' is not a file", path_str)),
        );
    }

    match fs::metadata(path) {
        Ok(metadata) if metadata.len() > MAX_READ_SIZE => {
            return ToolResult::failure(
                FILE_OPERATIONS,
                ToolError::invalid_argument(format!(
                    "File too large ({} bytes). Maximum size is {} bytes",
                    metadata.len(),
                    MAX_READ_SIZE
                )),
            );
        }
        Ok(_) => {}
        Err(e) => {
            return ToolResult::failure(
                FILE_OPERATIONS,
                ToolError::execution_failed(format!("Failed to read file metadata: {}", e)),
            );
        }
    }

    match fs::read_to_string(path) {
        Ok(content) => ToolResult::success(
            FILE_OPERATIONS,
            format!("Contents of '{}':\n\n{}", path_str, content),
        ),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            ToolResult::failure(FILE_OPERATIONS, ToolError::permission_denied(path_str))
        }
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => ToolResult::failure(
            FILE_OPERATIONS,
            ToolError::execution_failed(format!(
                "Cannot read '{}' as text (binary file?)",
                path_str
            )),
        ),
        Err(e) => ToolResult::failure(
            FILE_OPERATIONS,
            ToolError::execution_failed(format!("Failed to read file: {}", e)),
        ),
    }
}

fn list_directory(path_str: &str) -> ToolResult {
    let path = Path::new(path_str);

    if !path.exists() {
        return ToolResult::failure(
            FILE_OPERATIONS,
            ToolError::new(
                "NOT_FOUND",
                format!("Directory '{}' does not exist", path_str),
            ),
        );
    }

    if !path.is_dir() {
        return ToolResult::failure(
            FILE_OPERATIONS,
            ToolError::invalid_argument(format!("'{}' is not a directory", path_str)),
        );
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return ToolResult::failure(FILE_OPERATIONS, ToolError::permission_denied(path_str));
        }
        Err(e) => {
            return ToolResult::failure(
                FILE_OPERATIONS,
                ToolError::execution_failed(format!("Failed to list directory: {}", e)),
            );
        }
    };

    let mut items = Vec::new();
    for entry in entries.flatten() {
        let marker = if entry.path().is_dir() { "[dir] " } else { "[file]" };
        items.push(format!("{} {}", marker, entry.file_name().to_string_lossy()));
    }
    items.sort_by(|a, b| a[7..].cmp(&b[7..]));

    ToolResult::success(
        FILE_OPERATIONS,
        format!("Contents of directory '{}':\n\n{}", path_str, items.join("\n")),
    )
}
