//! WebScout CLI — the main entry point.
//!
//! Commands:
//! - `ask`     — Research one query and print the answer with its sources
//! - `onboard` — Write a default config file
//! - `doctor`  — Check config, keys and provider reachability

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "webscout",
    about = "WebScout: answer a query by planning, searching and checking",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging and print plans and drafts
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.webscout/config.toml
    #[arg(short, long, global = true, env = "WEBSCOUT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a query
    Ask {
        /// The query; read from stdin when omitted
        #[arg(short, long)]
        query: Option<String>,

        /// Override the iteration budget
        #[arg(short, long)]
        max_iterations: Option<u32>,
    },

    /// Write a default configuration file
    Onboard {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries progress and the answer
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Ask {
            query,
            max_iterations,
        } => commands::ask::run(config_path, query, max_iterations, cli.verbose).await?,
        Commands::Onboard { force } => commands::onboard::run(config_path, force).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}
