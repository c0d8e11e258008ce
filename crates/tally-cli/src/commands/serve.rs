//! Server command implementation

use anyhow::Result;
use tally_core::ForecastConfig;

pub async fn cmd_serve(
    mut config: ForecastConfig,
    host: Option<String>,
    port: Option<u16>,
    backend_url: Option<String>,
) -> Result<()> {
    apply_serve_overrides(&mut config, host, port, backend_url);

    println!("🚀 Starting Tally forecast service...");
    println!(
        "   Listening: http://{}:{}",
        config.server.host, config.server.port
    );
    println!("   Backend: {}", config.backend.url);
    println!("   Default horizon: {} month(s)", config.months_ahead);
    if config.server.allowed_origins.is_empty() {
        println!("   CORS: any origin");
    } else {
        println!("   CORS: {}", config.server.allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    tally_server::serve(&config).await
}

/// Command-line flags take precedence over file and environment settings
pub fn apply_serve_overrides(
    config: &mut ForecastConfig,
    host: Option<String>,
    port: Option<u16>,
    backend_url: Option<String>,
) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(url) = backend_url {
        config.backend.url = url;
    }
}
