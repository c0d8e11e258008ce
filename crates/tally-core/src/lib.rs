//! Tally Core Library
//!
//! Stateless forecasting pipeline for the Tally finance forecast service:
//! - Monthly aggregation of income/expense transactions
//! - Per-series linear trend fitting
//! - Forward projection with a non-negativity floor and synthetic fallback
//! - Rule-based insights derived from the projection
//! - Pluggable transaction sources (finance backend over HTTP, in-memory)
//! - TOML configuration with environment overrides

pub mod aggregate;
pub mod config;
pub mod error;
pub mod forecast;
pub mod insights;
pub mod models;
pub mod service;
pub mod source;
pub mod trend;

/// Test utilities including a mock finance backend
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::aggregate_monthly;
pub use config::{BackendConfig, FallbackProjection, ForecastConfig, ServerSettings};
pub use error::{Error, Result};
pub use forecast::{Forecaster, MAX_MONTHS_AHEAD};
pub use insights::{Insight, InsightEngine, InsightKind, InsightRule};
pub use models::{
    ForecastPoint, ForecastReport, HistoricalPoint, MonthlyBucket, RawTransaction, Transaction,
    TransactionType, YearMonth,
};
pub use service::ForecastService;
pub use source::{HttpTransactionSource, StaticTransactionSource, TransactionSource};
pub use trend::{SeriesModels, TrendModel};
