//! Forward projection of fitted trends
//!
//! Two paths:
//! - **Trend**: both series models trained; extrapolate past the last bucket
//!   with a floor at zero.
//! - **Fallback**: no usable history; a deterministic synthetic projection
//!   anchored at the current month.

use chrono::NaiveDate;

use crate::config::FallbackProjection;
use crate::error::{Error, Result};
use crate::models::{ForecastPoint, MonthlyBucket, YearMonth};
use crate::trend::SeriesModels;

/// Longest horizon accepted from configuration or a request
pub const MAX_MONTHS_AHEAD: u32 = 120;

/// Round to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Projects income, expense and profit `months_ahead` months forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecaster {
    months_ahead: u32,
    fallback: FallbackProjection,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(3, FallbackProjection::default())
    }
}

impl Forecaster {
    /// `months_ahead` is clamped to `1..=MAX_MONTHS_AHEAD`
    pub fn new(months_ahead: u32, fallback: FallbackProjection) -> Self {
        Self {
            months_ahead: months_ahead.clamp(1, MAX_MONTHS_AHEAD),
            fallback,
        }
    }

    pub fn months_ahead(&self) -> u32 {
        self.months_ahead
    }

    pub fn projection(&self) -> FallbackProjection {
        self.fallback
    }

    /// Trend path when models are available, fallback otherwise
    pub fn forecast(
        &self,
        models: Option<&SeriesModels>,
        buckets: &[MonthlyBucket],
        today: NaiveDate,
    ) -> Result<Vec<ForecastPoint>> {
        match models {
            Some(models) if !buckets.is_empty() => self.project(models, buckets),
            _ => self.fallback(today),
        }
    }

    /// Extrapolate both trends past the most recent bucket.
    pub fn project(
        &self,
        models: &SeriesModels,
        buckets: &[MonthlyBucket],
    ) -> Result<Vec<ForecastPoint>> {
        let last = buckets
            .last()
            .ok_or_else(|| Error::Forecast("cannot project without history".into()))?;

        (1..=self.months_ahead)
            .map(|i| {
                let future_index = (last.sequence_index as f64) + f64::from(i);
                let income = models.income.predict(future_index);
                let expense = models.expense.predict(future_index);
                // Checked before the floor: f64::max would turn NaN into 0
                if !income.is_finite() || !expense.is_finite() {
                    return Err(Error::Forecast(format!(
                        "non-finite prediction at index {}",
                        future_index
                    )));
                }
                point(advance(last.month, i)?, income.max(0.0), expense.max(0.0))
            })
            .collect()
    }

    /// Synthetic projection: month `i` is the base scaled by
    /// `1 + growth_step * i` (growth by offset, not compounded).
    pub fn fallback(&self, today: NaiveDate) -> Result<Vec<ForecastPoint>> {
        let anchor = YearMonth::from_date(today);
        let fb = &self.fallback;

        (1..=self.months_ahead)
            .map(|i| {
                let factor = 1.0 + fb.growth_step * f64::from(i);
                point(
                    advance(anchor, i)?,
                    (fb.base_income * factor).max(0.0),
                    (fb.base_expense * factor).max(0.0),
                )
            })
            .collect()
    }
}

/// Build a point from unrounded predictions; profit comes from the
/// rounded income and expense.
fn point(month: YearMonth, income: f64, expense: f64) -> Result<ForecastPoint> {
    let predicted_income = round2(income);
    let predicted_expense = round2(expense);
    let predicted_profit = round2(predicted_income - predicted_expense);

    // Scaling to cents overflows for amounts near f64::MAX
    let finite = predicted_income.is_finite()
        && predicted_expense.is_finite()
        && predicted_profit.is_finite();
    if !finite {
        return Err(Error::Forecast(format!(
            "prediction for {} is out of range",
            month
        )));
    }

    Ok(ForecastPoint {
        month,
        predicted_income,
        predicted_expense,
        predicted_profit,
    })
}

fn advance(month: YearMonth, n: u32) -> Result<YearMonth> {
    month
        .checked_add_months(n)
        .ok_or_else(|| Error::Forecast(format!("month overflow advancing {} by {}", month, n)))
}
