//! Plugin tools — declarative TOML manifests as tools
//!
//! Any conforming manifest placed in the plugin directory becomes an
//! available tool without core code changes. Each manifest describes one
//! tool: a name, a description, a shell command template with `{param}`
//! placeholders, and typed parameters.
//!
//! Loading is best-effort: a manifest that fails to parse is reported
//! through the event sink and skipped, and the remaining manifests still
//! load. A missing plugin directory is a warning, not an error.
//!
//! # Security
//!
//! All parameter values are shell-escaped before substitution to prevent
//! command injection: single-quote wrapping on Unix, double-quote wrapping
//! with character escaping on Windows.
//!
//! # Example Manifest
//!
//! ```toml
//! name = "weather"
//! description = "Get the current weather for a city"
//! command = "curl -s 'wttr.in/{city}?format=3'"
//!
//! [parameters.city]
//! description = "City name"
//! type = "string"
//! required = true
//! ```

use confab_application::ports::event_sink::ChatEventSink;
use confab_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Maximum captured output size (1 MiB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// On-disk manifest for one plugin tool
#[derive(Debug, Deserialize)]
struct PluginManifest {
    name: String,
    description: String,
    /// Command template with `{param_name}` placeholders
    command: String,
    /// BTreeMap keeps parameter ordering deterministic
    #[serde(default)]
    parameters: BTreeMap<String, ManifestParameter>,
}

#[derive(Debug, Deserialize)]
struct ManifestParameter {
    description: String,
    #[serde(rename = "type", default = "default_param_type")]
    param_type: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    values: Option<Vec<String>>,
}

fn default_param_type() -> String {
    "string".to_string()
}

/// A tool backed by a shell command template from a plugin manifest
pub struct ManifestTool {
    definition: ToolDefinition,
    command_template: String,
}

impl ManifestTool {
    fn from_manifest(manifest: PluginManifest) -> Result<Self, String> {
        if manifest.name.trim().is_empty() {
            return Err("manifest has an empty tool name".to_string());
        }
        if manifest.command.trim().is_empty() {
            return Err(format!("tool '{}' has an empty command", manifest.name));
        }

        let mut definition = ToolDefinition::new(manifest.name, manifest.description);
        for (name, param) in manifest.parameters {
            let mut spec = ToolParameter::new(name, param.description, param.required)
                .with_type(param.param_type);
            if let Some(values) = param.values {
                spec = spec.with_allowed_values(values);
            }
            definition = definition.with_parameter(spec);
        }

        Ok(Self {
            command_template: manifest.command,
            definition,
        })
    }

    /// Build the final command string by substituting parameters.
    ///
    /// `{param_name}` placeholders are replaced with shell-escaped argument
    /// values; placeholders for omitted optional parameters become empty.
    fn build_command(&self, call: &ToolCall) -> String {
        let mut command = self.command_template.clone();

        for (key, value) in &call.arguments {
            let placeholder = format!("{{{}}}", key);
            let value_str = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            command = command.replace(&placeholder, &shell_escape(&value_str));
        }

        // Clear placeholders for optional parameters that were not provided
        for param in &self.definition.parameters {
            let placeholder = format!("{{{}}}", param.name);
            command = command.replace(&placeholder, "");
        }

        command
    }
}

impl Tool for ManifestTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn execute(&self, call: &ToolCall) -> ToolResult {
        let tool_name = &self.definition.name;
        let command_str = self.build_command(call);
        debug!(tool = %tool_name, command = %command_str, "Running plugin tool");

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", &command_str]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", &command_str]);
            c
        };

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                return ToolResult::failure(
                    tool_name,
                    ToolError::execution_failed(format!("Failed to execute command: {}", e)),
                );
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let mut result_text = String::new();
        if !stdout.is_empty() {
            result_text.push_str(truncate(&stdout));
        }
        if !stderr.is_empty() {
            if !result_text.is_empty() {
                result_text.push_str("\n--- stderr ---\n");
            }
            result_text.push_str(truncate(&stderr));
        }

        if result_text.is_empty() {
            result_text = if output.status.success() {
                "Command completed successfully (no output)".to_string()
            } else {
                format!("Command failed with exit code: {:?}", output.status.code())
            };
        }

        if output.status.success() {
            ToolResult::success(tool_name, result_text)
        } else {
            ToolResult::failure(tool_name, ToolError::execution_failed(result_text))
        }
    }
}

fn truncate(s: &str) -> &str {
    if s.len() > MAX_OUTPUT_SIZE {
        let mut end = MAX_OUTPUT_SIZE;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    } else {
        s
    }
}

/// Load every tool manifest from the plugin directory.
///
/// Manifests load in filename order so registration order is
/// deterministic. A manifest that fails to load is reported and skipped; a
/// missing directory is a warning and yields no tools.
pub fn load_plugin_tools(dir: &Path, sink: &dyn ChatEventSink) -> Vec<Box<dyn Tool>> {
    if !dir.is_dir() {
        let message = format!("Plugin directory '{}' not found", dir.display());
        warn!("{}", message);
        sink.warning(&message);
        return Vec::new();
    }

    let mut paths: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect(),
        Err(e) => {
            let message = format!("Failed to scan plugin directory '{}': {}", dir.display(), e);
            warn!("{}", message);
            sink.warning(&message);
            return Vec::new();
        }
    };
    paths.sort();

    let mut tools: Vec<Box<dyn Tool>> = Vec::new();
    for path in paths {
        match load_manifest(&path) {
            Ok(tool) => tools.push(Box::new(tool)),
            Err(e) => {
                let message = format!("Skipping plugin '{}': {}", path.display(), e);
                warn!("{}", message);
                sink.warning(&message);
            }
        }
    }

    tools
}

fn load_manifest(path: &Path) -> Result<ManifestTool, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let manifest: PluginManifest = toml::from_str(&content).map_err(|e| e.to_string())?;
    ManifestTool::from_manifest(manifest)
}

/// Escape a string for safe shell substitution
fn shell_escape(s: &str) -> String {
    if s.chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '/')
    {
        return s.to_string();
    }

    if cfg!(target_os = "windows") {
        shell_escape_windows(s)
    } else {
        shell_escape_unix(s)
    }
}

/// Unix shell escape: wrap in single quotes, escape internal single quotes
fn shell_escape_unix(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 4);
    escaped.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(ch);
        }
    }
    escaped.push('\'');
    escaped
}

/// Windows cmd.exe escape: wrap in double quotes, escape `"`, `%`, and `!`
fn shell_escape_windows(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 4);
    escaped.push('"');
    for ch in s.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '%' => escaped.push_str("%%"),
            '!' => escaped.push_str("^!"),
            _ => escaped.push(ch),
        }
    }
    escaped.push('"');
    escaped
}
