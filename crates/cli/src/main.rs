//! toolrelay CLI: the main entry point.
//!
//! Starts an interactive chat with the configured model.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use toolrelay_agent::ChatSession;
use toolrelay_config::AppConfig;

mod render;
mod repl;

#[derive(Parser)]
#[command(
    name = "toolrelay",
    about = "Chat with Claude from the terminal, with local file tools",
    version,
    author
)]
struct Cli {
    /// Path to a config file (default: ~/.toolrelay/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured model
    #[arg(long)]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the chat on stdout
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    }
    .map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(model) = cli.model {
        config.model = model;
        config.validate()?;
    }

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export ANTHROPIC_API_KEY='sk-ant-...'");
        eprintln!("    export TOOLRELAY_API_KEY='sk-ant-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!("    api_key = \"sk-ant-...\"");
        eprintln!();
        eprintln!("  Get a key at: https://console.anthropic.com/settings/keys");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    tracing::debug!(?config, "Configuration loaded");

    let provider = toolrelay_providers::build_from_config(&config)?;
    let tools = Arc::new(toolrelay_tools::default_registry(&config.tool_root())?);
    let session = ChatSession::new(provider, tools, &config.model)
        .with_max_tokens(config.max_tokens)
        .with_system_prompt(config.system_prompt.clone());

    repl::run(session).await
}
