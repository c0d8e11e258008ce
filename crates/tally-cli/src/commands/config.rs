//! Configuration commands

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::ForecastConfig;

/// Load the effective configuration (file layer then environment)
pub fn load_config(path: Option<&Path>) -> Result<ForecastConfig> {
    ForecastConfig::load(path).context("Failed to load configuration")
}

pub fn cmd_config(config: &ForecastConfig) -> Result<()> {
    let rendered = config.to_toml()?;

    println!("# Effective Tally configuration");
    match tally_core::config::default_config_path() {
        Some(path) => println!("# Override file: {}", path.display()),
        None => println!("# Override file: (no config directory)"),
    }
    println!();
    print!("{}", rendered);

    Ok(())
}
