//! promptctl
//!
//! Command-line host for the prompt provider library.
//! Resolves, lists, creates and relabels prompts; prints JSON on stdout.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    BatchCommand, CreateCommand, GetCommand, GetManyCommand, LabelsCommand, ListCommand,
};
use prompt_provider_core::{logging, AppConfig};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// promptctl - resolve and manage registry-backed prompts
#[derive(Parser, Debug)]
#[command(name = "promptctl")]
#[command(about = "Resolve and manage registry-backed prompts", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ./prompts.yaml)
    #[arg(short, long, global = true, env = "PROMPT_PROVIDER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Registry base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve one prompt
    Get(GetCommand),

    /// Resolve several prompts with one label
    GetMany(GetManyCommand),

    /// Resolve a JSON list of queries
    Batch(BatchCommand),

    /// List every prompt in the registry
    List(ListCommand),

    /// Create a new prompt version
    Create(CreateCommand),

    /// Move labels onto a prompt version
    Labels(LabelsCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.config.as_deref(), |name| std::env::var(name).ok())?
        .with_overrides(cli.base_url, cli.log_level, cli.verbose, cli.no_color);

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("promptctl starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Registry provider: {}", config.registry.provider);

    config.validate()?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            interrupt.cancel();
        }
    });

    let command_name = match &cli.command {
        Commands::Get(_) => "get",
        Commands::GetMany(_) => "get-many",
        Commands::Batch(_) => "batch",
        Commands::List(_) => "list",
        Commands::Create(_) => "create",
        Commands::Labels(_) => "labels",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let resolver = commands::build_resolver(&config)?;

    let result = match cli.command {
        Commands::Get(cmd) => cmd.execute(&resolver, &cancel).await,
        Commands::GetMany(cmd) => cmd.execute(&resolver, &cancel).await,
        Commands::Batch(cmd) => cmd.execute(&resolver, &cancel).await,
        Commands::List(cmd) => cmd.execute(&resolver, &cancel).await,
        Commands::Create(cmd) => cmd.execute(&resolver, &cancel).await,
        Commands::Labels(cmd) => cmd.execute(&resolver, &cancel).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {:#}", e),
    }

    result
}
