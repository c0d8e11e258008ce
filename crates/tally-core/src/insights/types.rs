//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The rule outcome that produced an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Income projected to grow
    IncomeGrowth,
    /// Income projected to decline
    IncomeDecline,
    /// Expenses projected to grow rapidly
    ExpenseGrowth,
    /// Average margin below the healthy band
    LowMargin,
    /// Average margin above the healthy band
    StrongMargin,
    /// At least one month projected at a loss
    CashFlowRisk,
    /// Nothing notable; keep going
    Steady,
    /// Projection is synthetic because the real pipeline could not run
    Estimated,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::IncomeGrowth => "income_growth",
            InsightKind::IncomeDecline => "income_decline",
            InsightKind::ExpenseGrowth => "expense_growth",
            InsightKind::LowMargin => "low_margin",
            InsightKind::StrongMargin => "strong_margin",
            InsightKind::CashFlowRisk => "cash_flow_risk",
            InsightKind::Steady => "steady",
            InsightKind::Estimated => "estimated",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income_growth" => Ok(InsightKind::IncomeGrowth),
            "income_decline" => Ok(InsightKind::IncomeDecline),
            "expense_growth" => Ok(InsightKind::ExpenseGrowth),
            "low_margin" => Ok(InsightKind::LowMargin),
            "strong_margin" => Ok(InsightKind::StrongMargin),
            "cash_flow_risk" => Ok(InsightKind::CashFlowRisk),
            "steady" => Ok(InsightKind::Steady),
            "estimated" => Ok(InsightKind::Estimated),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// A single human-readable insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    pub fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Generic note used when no rule fires
    pub fn steady() -> Self {
        Self::new(
            InsightKind::Steady,
            "Maintain current financial practices. Monitor trends regularly.",
        )
    }

    /// Note attached to a synthetic projection after a pipeline failure
    pub fn estimated() -> Self {
        Self::new(
            InsightKind::Estimated,
            "Using estimated projections. Add more transaction data for accurate predictions.",
        )
    }
}
