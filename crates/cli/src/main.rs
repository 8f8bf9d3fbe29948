//! Sift CLI — the main entry point.
//!
//! Commands:
//! - `init`   — Create a starter config file
//! - `ask`    — Answer a question, or enter interactive mode
//! - `config` — Validate, show, or locate the configuration
//! - `doctor` — Diagnose connectivity and configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "sift",
    about = "Sift — adaptive web research agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter configuration file
    Init,

    /// Answer a question using iterative web search
    Ask {
        /// The question. Omit to enter interactive mode.
        query: Option<String>,

        /// Extra context to steer the search
        #[arg(short, long)]
        context: Option<String>,

        /// Print the full session as JSON instead of the answer text
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Parse the config and report problems
    Validate,
    /// Print the effective config (secrets redacted)
    Show,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Ask {
            query,
            context,
            json,
        } => commands::ask::run(query, context, json).await?,
        Commands::Config { action } => match action {
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
