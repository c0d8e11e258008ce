//! Forecast handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, error};

use crate::{AppError, AppState, MAX_MONTHS_AHEAD};
use tally_core::ForecastReport;

/// Query parameters for a forecast
#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    /// Horizon in months; parsed by hand so bad values get a JSON error
    pub months_ahead: Option<String>,
}

/// Resolve the requested horizon, falling back to `default`
pub fn parse_months_ahead(raw: Option<&str>, default: u32) -> Result<u32, AppError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request("months_ahead must be a positive integer"))?;

    if value < 1 {
        return Err(AppError::bad_request(
            "months_ahead must be a positive integer",
        ));
    }
    if value > i64::from(MAX_MONTHS_AHEAD) {
        return Err(AppError::bad_request(&format!(
            "months_ahead must be at most {}",
            MAX_MONTHS_AHEAD
        )));
    }

    Ok(value as u32)
}

/// GET /predict - Forecast income, expense and profit
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictQuery>,
) -> Result<Json<ForecastReport>, AppError> {
    let months_ahead =
        parse_months_ahead(params.months_ahead.as_deref(), state.service.months_ahead())?;

    let transactions = state.source.fetch_transactions().await;
    let today = Utc::now().date_naive();
    let service = Arc::new(state.service.with_months_ahead(months_ahead));

    debug!(
        source = state.source.name(),
        transactions = transactions.len(),
        months_ahead,
        "Running forecast"
    );

    let worker = Arc::clone(&service);
    let report =
        match tokio::task::spawn_blocking(move || worker.run(&transactions, today)).await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "Forecast task failed; returning estimated projection");
                service.fallback_report(&format!("forecast task failed: {}", e), today)
            }
        };

    Ok(Json(report))
}
