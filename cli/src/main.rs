//! CLI entrypoint for confab
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::Result;
use clap::Parser;
use confab_application::use_cases::chat_turn::ChatTurnUseCase;
use confab_infrastructure::{
    builtin_tools, load_plugin_tools, ChatConfig, ConfigLoader, JsonSchemaToolConverter,
    OpenAiGateway, ToolRegistry,
};
use confab_presentation::{ChatRepl, Cli, ConsoleSink};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting confab");

    let config = load_config(&cli);

    // === Dependency Injection ===
    let sink = Arc::new(ConsoleSink::new());

    let mut registry = ToolRegistry::new(sink.clone());
    registry.register_all(builtin_tools());

    let plugin_dir = cli.plugins.clone().or_else(|| config.resolved_plugin_dir());
    if let Some(dir) = plugin_dir {
        registry.register_all(load_plugin_tools(&dir, sink.as_ref()));
    }

    let gateway = Arc::new(OpenAiGateway::new(&config.base_url, &config.api_key));

    let use_case = ChatTurnUseCase::new(
        gateway,
        Arc::new(registry),
        Arc::new(JsonSchemaToolConverter),
        config.generation_params(),
        config.system_prompt.clone(),
    )
    .with_event_sink(sink.clone());

    // Single question mode
    if let Some(question) = cli.question {
        let mut use_case = use_case;
        let reply = use_case.run_turn(&question).await;
        println!("{}", reply);
        return Ok(());
    }

    // Interactive chat
    let repl = ChatRepl::new(use_case, sink);
    repl.run(&config.model).await?;

    Ok(())
}

/// Load and validate configuration, terminating with guidance on failure.
///
/// Configuration errors are deliberately fatal at startup: the error and
/// its remediation steps are printed, and the process exits non-zero.
fn load_config(cli: &Cli) -> ChatConfig {
    let loaded = if cli.no_config {
        Ok(ConfigLoader::load_defaults())
    } else {
        ConfigLoader::load(cli.config.as_ref())
    };

    let config = match loaded {
        Ok(config) => config,
        Err(e) => exit_with_config_error(&e),
    };

    if let Err(e) = config.validate() {
        exit_with_config_error(&e);
    }

    config
}

fn exit_with_config_error(error: &confab_infrastructure::ConfigError) -> ! {
    eprintln!("Error: {}", error);
    if let Some(remediation) = error.remediation() {
        eprintln!();
        eprintln!("{}", remediation);
    }
    std::process::exit(1);
}
