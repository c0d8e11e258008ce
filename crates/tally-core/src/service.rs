//! Forecast pipeline
//!
//! Transactions → monthly buckets → trend models → forecast → insights →
//! report. The pipeline always produces a report: internal failures degrade
//! to the synthetic projection with the cause recorded in `error`.

use chrono::NaiveDate;
use tracing::{debug, error};

use crate::aggregate::aggregate_monthly;
use crate::config::{FallbackProjection, ForecastConfig};
use crate::error::Result;
use crate::forecast::Forecaster;
use crate::insights::{Insight, InsightEngine};
use crate::models::{ForecastReport, HistoricalPoint, RawTransaction};
use crate::source::TransactionSource;
use crate::trend::SeriesModels;

/// Stateless forecast pipeline; safe to share across concurrent requests
pub struct ForecastService {
    forecaster: Forecaster,
    insights: InsightEngine,
    history_months: usize,
}

impl Default for ForecastService {
    fn default() -> Self {
        Self::new(3, 6, FallbackProjection::default())
    }
}

impl ForecastService {
    pub fn new(months_ahead: u32, history_months: usize, fallback: FallbackProjection) -> Self {
        Self {
            forecaster: Forecaster::new(months_ahead, fallback),
            insights: InsightEngine::new(),
            history_months,
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.months_ahead, config.history_months, config.fallback)
    }

    /// Same pipeline with a different horizon
    pub fn with_months_ahead(&self, months_ahead: u32) -> Self {
        Self {
            forecaster: Forecaster::new(months_ahead, self.forecaster.projection()),
            insights: InsightEngine::new(),
            history_months: self.history_months,
        }
    }

    pub fn months_ahead(&self) -> u32 {
        self.forecaster.months_ahead()
    }

    /// Run the pipeline, degrading to the fallback report on failure
    pub fn run(&self, transactions: &[RawTransaction], today: NaiveDate) -> ForecastReport {
        match self.try_run(transactions, today) {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "Forecast pipeline failed; returning estimated projection");
                self.fallback_report(&e.to_string(), today)
            }
        }
    }

    /// Run the pipeline, surfacing internal errors
    pub fn try_run(
        &self,
        transactions: &[RawTransaction],
        today: NaiveDate,
    ) -> Result<ForecastReport> {
        let buckets = aggregate_monthly(transactions);
        let models = SeriesModels::fit(&buckets);
        let predictions = self.forecaster.forecast(models.as_ref(), &buckets, today)?;
        let insights = self.insights.messages(&predictions);

        let skip = buckets.len().saturating_sub(self.history_months);
        let historical: Vec<HistoricalPoint> =
            buckets[skip..].iter().map(HistoricalPoint::from).collect();

        debug!(
            transactions = transactions.len(),
            data_points = buckets.len(),
            model_trained = models.is_some(),
            predictions = predictions.len(),
            insights = insights.len(),
            "Forecast complete"
        );

        Ok(ForecastReport {
            success: true,
            predictions,
            insights,
            historical,
            model_trained: models.is_some(),
            data_points: buckets.len(),
            error: None,
        })
    }

    /// Best-effort report used when the pipeline itself could not run
    pub fn fallback_report(&self, cause: &str, today: NaiveDate) -> ForecastReport {
        // Unreachable for a configured service: month arithmetic from a
        // calendar date cannot overflow and config validation bounds the
        // fallback amounts. Only a hand-built projection near f64::MAX errs.
        let predictions = self.forecaster.fallback(today).unwrap_or_default();

        ForecastReport {
            success: true,
            predictions,
            insights: vec![Insight::estimated().message],
            historical: vec![],
            model_trained: false,
            data_points: 0,
            error: Some(cause.to_string()),
        }
    }

    /// Fetch from `source` and run the pipeline
    pub async fn predict(&self, source: &dyn TransactionSource, today: NaiveDate) -> ForecastReport {
        let transactions = source.fetch_transactions().await;
        debug!(
            source = source.name(),
            count = transactions.len(),
            "Transactions loaded"
        );
        self.run(&transactions, today)
    }
}
