//! Presentation layer for confab
//!
//! Console rendering for chat events, the interactive REPL, and the CLI
//! argument definition.

pub mod chat;
pub mod cli;
pub mod output;

pub use chat::ChatRepl;
pub use cli::Cli;
pub use output::ConsoleSink;
