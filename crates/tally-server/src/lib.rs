//! Tally Web Server
//!
//! Axum-based REST API for the Tally forecast service.
//!
//! - `GET /predict` runs a forecast against the configured transaction source
//! - `GET /health` reports liveness
//! - CORS limited to configured origins (any origin when none are configured)
//! - JSON error bodies for rejected requests

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use tally_core::{ForecastConfig, ForecastService, HttpTransactionSource, TransactionSource};

pub use tally_core::MAX_MONTHS_AHEAD;

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            allowed_origins: config.server.allowed_origins.clone(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub service: ForecastService,
    pub source: Arc<dyn TransactionSource>,
}

/// Create the application router
pub fn create_router(
    service: ForecastService,
    source: Arc<dyn TransactionSource>,
    config: ServerConfig,
) -> Router {
    let cors = build_cors(&config);

    let state = Arc::new(AppState { service, source });

    Router::new()
        .route("/predict", get(handlers::predict))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn build_cors(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        cors.allow_origin(origins)
    }
}

/// Start the server using the backend, forecast and server settings in `config`
pub async fn serve(config: &ForecastConfig) -> anyhow::Result<()> {
    let source = HttpTransactionSource::from_config(&config.backend);
    serve_with_config(
        ForecastService::from_config(config),
        Arc::new(source),
        &config.server.host,
        config.server.port,
        ServerConfig::from_config(config),
    )
    .await
}

/// Start the server with an explicit service and source
pub async fn serve_with_config(
    service: ForecastService,
    source: Arc<dyn TransactionSource>,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_source(source.as_ref()).await;

    let app = create_router(service, source, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting forecast service at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log whether the transaction source currently has data
async fn check_source(source: &dyn TransactionSource) {
    let count = source.fetch_transactions().await.len();
    if count > 0 {
        info!(source = source.name(), count, "✅ Transaction source reachable");
    } else {
        warn!(
            source = source.name(),
            "⚠️  Transaction source returned no data; forecasts will use estimated projections"
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}
