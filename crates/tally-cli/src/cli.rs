//! CLI argument definitions using clap
//!
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Forecast income, expenses and profit from transaction history
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Financial forecast service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.config/tally/forecast.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the forecast API server
    Serve {
        /// Host to bind to [config default: 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on [config default: 5001]
        #[arg(short, long)]
        port: Option<u16>,

        /// Finance backend base URL (transactions at <URL>/transactions)
        #[arg(long)]
        backend_url: Option<String>,
    },

    /// Run a single forecast and print it
    Predict {
        /// JSON file with an array of transactions (fetches from the backend if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Number of months to forecast
        #[arg(short, long)]
        months_ahead: Option<u32>,

        /// Print the raw report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config,
}
