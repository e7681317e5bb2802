//! Console renderer for chat events
//!
//! Implements the [`ChatEventSink`] port and renders the conversation:
//! role-tagged message blocks, tool activity lines, the welcome banner,
//! and the help listing. The core hands over structured data; all
//! formatting decisions live here.

use colored::Colorize;
use confab_application::ports::event_sink::ChatEventSink;

/// Longest tool argument/result preview printed inline
const PREVIEW_LEN: usize = 200;

/// Console implementation of the chat event sink
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }

    /// Print the welcome banner
    pub fn print_welcome(&self, model: &str) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│                confab - chat                │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model: {}", model);
        println!();
        println!("Commands:");
        println!("  help   - Show commands and available tools");
        println!("  tools  - List available tools");
        println!("  quit   - Exit (also: exit, Ctrl-D)");
        println!();
    }

    /// Print the help listing with the registered tool names
    pub fn print_help(&self, tools: &[String]) {
        println!();
        println!("{}", "Commands:".cyan().bold());
        println!("  help         - Show this help");
        println!("  tools        - List available tools");
        println!("  quit, exit   - Exit the chat");
        println!("  anything else is sent to the model");
        self.print_tools(tools);
        println!();
    }

    /// Print the registered tool names
    pub fn print_tools(&self, tools: &[String]) {
        if tools.is_empty() {
            println!("{}", "No tools registered".yellow());
        } else {
            println!("{} {}", "Available tools:".cyan(), tools.join(", "));
        }
    }

    /// Print a user message block
    pub fn user_message(&self, content: &str) {
        println!();
        println!("{}", "── You ──".blue().bold());
        println!("{}", content);
    }

    /// Print an assistant message block
    pub fn assistant_message(&self, content: &str) {
        println!();
        println!("{}", "── Assistant ──".green().bold());
        println!("{}", content);
        println!();
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatEventSink for ConsoleSink {
    fn tool_registered(&self, name: &str) {
        println!("{} Registered tool: {}", "✓".green(), name);
    }

    fn tool_call_started(&self, name: &str, arguments: &str) {
        println!(
            "{} {}({})",
            "Calling tool:".cyan(),
            name.bold(),
            preview(arguments)
        );
    }

    fn tool_call_finished(&self, name: &str, result: &str, is_error: bool) {
        if is_error {
            println!("{} {} → {}", "Tool failed:".red(), name, preview(result));
        } else {
            println!("{} {} → {}", "Tool result:".cyan(), name, preview(result).dimmed());
        }
    }

    fn warning(&self, message: &str) {
        println!("{} {}", "Warning:".yellow().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
}

/// Single-line preview, truncated with an ellipsis
fn preview(s: &str) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() > PREVIEW_LEN {
        let truncated: String = flat.chars().take(PREVIEW_LEN).collect();
        format!("{}…", truncated)
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_and_flattens() {
        let long = "x".repeat(300);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_LEN + 1);
        assert!(p.ends_with('…'));

        assert_eq!(preview("a\nb"), "a b");
        assert_eq!(preview("short"), "short");
    }
}
