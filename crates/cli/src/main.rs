//! Roundtable CLI — the main entry point.
//!
//! Commands:
//! - `scenarios` — List the built-in scenario catalog
//! - `run`       — Execute one orchestration run and print the transcript

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "roundtable",
    about = "Roundtable — bounded-round multi-role orchestration",
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
    /// List the built-in scenarios
    Scenarios,

    /// Run a scenario through the orchestration loop
    Run {
        /// Scenario key (see `roundtable scenarios`)
        #[arg(short, long, default_value = "weather")]
        scenario: String,

        /// Override the configured provider kind for this run
        #[arg(short, long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Scenarios => commands::scenarios::run(),
        Commands::Run { scenario, provider } => commands::run::run(scenario, provider).await?,
    }

    Ok(())
}
