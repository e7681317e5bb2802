//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for confab
#[derive(Parser, Debug)]
#[command(name = "confab")]
#[command(author, version, about = "Chat with an OpenAI-compatible model from your terminal")]
#[command(long_about = r#"
Confab is a command-line chat client with local tool support. The model can
invoke a calculator, a clock, file operations, and any tool manifests found
in the plugin directory.

Configuration is merged from (lowest to highest priority):
1. ~/.config/confab/config.toml   Global config
2. ./confab.toml                  Project-level config
3. --config <path>                Explicit config file
4. Environment variables          OPENAI_API_KEY, MODEL, MAX_TOKENS, ...

Example:
  confab                                  Start an interactive chat
  confab "What time is it in UTC?"        Ask a single question
  confab --plugins ./tools "list ./src"   Use a custom plugin directory
"#)]
pub struct Cli {
    /// Ask a single question and exit (omit for interactive chat)
    pub question: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Plugin manifest directory (overrides configuration)
    #[arg(long, value_name = "PATH")]
    pub plugins: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}
