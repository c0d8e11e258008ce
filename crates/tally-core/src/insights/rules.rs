//! Built-in insight rules
//!
//! Thresholds are fixed policy. Band comparisons are strict, so a value
//! exactly on a threshold emits nothing.

use crate::models::ForecastPoint;

use super::engine::InsightRule;
use super::types::{Insight, InsightKind};

/// Income above this growth (percent) is called out
const INCOME_GROWTH_PCT: f64 = 5.0;
/// Income below this change (percent) is a decline warning
const INCOME_DECLINE_PCT: f64 = -5.0;
/// Expense growth above this (percent) is a warning
const EXPENSE_GROWTH_PCT: f64 = 10.0;
/// Healthy average margin band (percent), exclusive on both ends
const MARGIN_LOW_PCT: f64 = 20.0;
const MARGIN_HIGH_PCT: f64 = 30.0;

/// Percent change from the first to the last value.
/// None with fewer than two points or a zero starting value.
fn percent_change(forecast: &[ForecastPoint], value: fn(&ForecastPoint) -> f64) -> Option<f64> {
    if forecast.len() < 2 {
        return None;
    }
    let first = value(forecast.first()?);
    let last = value(forecast.last()?);
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

/// Growth or decline of projected income across the horizon
pub struct IncomeTrendRule;

impl InsightRule for IncomeTrendRule {
    fn name(&self) -> &'static str {
        "Income Trend"
    }

    fn evaluate(&self, forecast: &[ForecastPoint]) -> Option<Insight> {
        let growth = percent_change(forecast, |p| p.predicted_income)?;

        if growth > INCOME_GROWTH_PCT {
            Some(Insight::new(
                InsightKind::IncomeGrowth,
                format!(
                    "Income projected to grow by {:.1}% over the next {} months.",
                    growth,
                    forecast.len()
                ),
            ))
        } else if growth < INCOME_DECLINE_PCT {
            Some(Insight::new(
                InsightKind::IncomeDecline,
                format!(
                    "⚠️ Income projected to decline by {:.1}%. Consider revenue optimization strategies.",
                    growth.abs()
                ),
            ))
        } else {
            None
        }
    }
}

/// Rapid growth of projected expenses
pub struct ExpenseTrendRule;

impl InsightRule for ExpenseTrendRule {
    fn name(&self) -> &'static str {
        "Expense Trend"
    }

    fn evaluate(&self, forecast: &[ForecastPoint]) -> Option<Insight> {
        let growth = percent_change(forecast, |p| p.predicted_expense)?;

        (growth > EXPENSE_GROWTH_PCT).then(|| {
            Insight::new(
                InsightKind::ExpenseGrowth,
                format!(
                    "⚠️ Expenses growing rapidly at {:.1}%. Review cost control measures.",
                    growth
                ),
            )
        })
    }
}

/// Average profit margin over months with positive income
pub struct ProfitMarginRule;

impl ProfitMarginRule {
    /// Mean margin in percent; months without income are left out entirely
    pub fn average_margin(forecast: &[ForecastPoint]) -> Option<f64> {
        let margins: Vec<f64> = forecast
            .iter()
            .filter(|p| p.predicted_income > 0.0)
            .map(|p| p.predicted_profit * 100.0 / p.predicted_income)
            .collect();

        if margins.is_empty() {
            return None;
        }
        Some(margins.iter().sum::<f64>() / margins.len() as f64)
    }
}

impl InsightRule for ProfitMarginRule {
    fn name(&self) -> &'static str {
        "Profit Margin"
    }

    fn evaluate(&self, forecast: &[ForecastPoint]) -> Option<Insight> {
        let margin = Self::average_margin(forecast)?;

        if margin < MARGIN_LOW_PCT {
            Some(Insight::new(
                InsightKind::LowMargin,
                format!(
                    "Profit margin at {:.1}% is below optimal. Consider cost reduction or pricing adjustments.",
                    margin
                ),
            ))
        } else if margin > MARGIN_HIGH_PCT {
            Some(Insight::new(
                InsightKind::StrongMargin,
                format!(
                    "Strong profit margin of {:.1}% projected. Good financial health.",
                    margin
                ),
            ))
        } else {
            None
        }
    }
}

/// Months projected at a loss
pub struct CashFlowRiskRule;

impl InsightRule for CashFlowRiskRule {
    fn name(&self) -> &'static str {
        "Cash Flow Risk"
    }

    fn evaluate(&self, forecast: &[ForecastPoint]) -> Option<Insight> {
        let at_risk = forecast
            .iter()
            .filter(|p| p.predicted_profit < 0.0)
            .count();

        (at_risk > 0).then(|| {
            Insight::new(
                InsightKind::CashFlowRisk,
                format!(
                    "⚠️ Potential cash flow issues in {} month(s). Plan accordingly.",
                    at_risk
                ),
            )
        })
    }
}
