//! Tally CLI - Finance forecast service
//!
//! Usage:
//!   tally serve --port 5001            Start the forecast API
//!   tally predict --file tx.json       Forecast from a JSON export
//!   tally predict --months-ahead 6     Forecast from the finance backend
//!   tally config                       Show effective configuration

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            backend_url,
        } => commands::cmd_serve(config, host, port, backend_url).await,
        Commands::Predict {
            file,
            months_ahead,
            json,
        } => commands::cmd_predict(&config, file.as_deref(), months_ahead, json).await,
        Commands::Config => commands::cmd_config(&config),
    }
}
