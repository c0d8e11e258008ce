//! Linear trend fitting over the monthly sequence index

use serde::Serialize;

use crate::models::MonthlyBucket;

/// Fitted `slope * x + intercept` predictor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendModel {
    /// Ordinary least squares fit of y on x.
    /// Returns None with fewer than 2 points or when x has no variance.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut num = 0.0;
        let mut den = 0.0;
        for &(x, y) in points {
            num += (x - x_mean) * (y - y_mean);
            den += (x - x_mean) * (x - x_mean);
        }
        if den.abs() < 1e-12 {
            return None;
        }

        let slope = num / den;
        Some(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// The income and expense models fitted over the same buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesModels {
    pub income: TrendModel,
    pub expense: TrendModel,
}

impl SeriesModels {
    /// Fit both series; either both train or neither does.
    pub fn fit(buckets: &[MonthlyBucket]) -> Option<Self> {
        let income: Vec<(f64, f64)> = buckets
            .iter()
            .map(|b| (b.sequence_index as f64, b.income_total))
            .collect();
        let expense: Vec<(f64, f64)> = buckets
            .iter()
            .map(|b| (b.sequence_index as f64, b.expense_total))
            .collect();

        Some(Self {
            income: TrendModel::fit(&income)?,
            expense: TrendModel::fit(&expense)?,
        })
    }
}
