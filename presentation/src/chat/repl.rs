//! REPL (Read-Eval-Print Loop) for interactive chat
//!
//! Commands (`quit`, `exit`, `help`, `tools`) are dispatched outside the
//! conversation loop; any other non-empty input is a chat turn.

use crate::output::ConsoleSink;
use confab_application::use_cases::chat_turn::ChatTurnUseCase;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;

/// Outcome of command dispatch
enum CommandOutcome {
    /// The session should end
    Exit,
    /// The input was a command and has been handled
    Handled,
    /// The input is a chat message
    NotACommand,
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: ChatTurnUseCase,
    console: Arc<ConsoleSink>,
}

impl ChatRepl {
    pub fn new(use_case: ChatTurnUseCase, console: Arc<ConsoleSink>) -> Self {
        Self { use_case, console }
    }

    /// Run the interactive REPL
    pub async fn run(mut self, model: &str) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = dirs::data_dir().map(|p| p.join("confab").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.console.print_welcome(model);

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    match self.dispatch_command(line) {
                        CommandOutcome::Exit => break,
                        CommandOutcome::Handled => continue,
                        CommandOutcome::NotACommand => {}
                    }

                    let _ = rl.add_history_entry(line);

                    self.console.user_message(line);
                    let reply = self.use_case.run_turn(line).await;
                    self.console.assistant_message(&reply);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn dispatch_command(&self, line: &str) -> CommandOutcome {
        match line.to_lowercase().as_str() {
            "quit" | "exit" => {
                println!("Goodbye!");
                CommandOutcome::Exit
            }
            "help" => {
                self.console.print_help(&self.use_case.tool_names());
                CommandOutcome::Handled
            }
            "tools" => {
                self.console.print_tools(&self.use_case.tool_names());
                CommandOutcome::Handled
            }
            _ => CommandOutcome::NotACommand,
        }
    }
}
