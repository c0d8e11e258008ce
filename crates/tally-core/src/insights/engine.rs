//! Insight Engine - runs the rule list over a forecast

use crate::models::ForecastPoint;

use super::rules::{CashFlowRiskRule, ExpenseTrendRule, IncomeTrendRule, ProfitMarginRule};
use super::types::Insight;

/// A single insight rule. Rules are independent and pure.
pub trait InsightRule: Send + Sync {
    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Inspect the forecast and produce at most one insight
    fn evaluate(&self, forecast: &[ForecastPoint]) -> Option<Insight>;
}

/// Evaluates registered rules in registration order
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules in their fixed order
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(IncomeTrendRule));
        engine.register(Box::new(ExpenseTrendRule));
        engine.register(Box::new(ProfitMarginRule));
        engine.register(Box::new(CashFlowRiskRule));

        engine
    }

    /// Append a rule after the existing ones
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Run every rule; never returns an empty list.
    pub fn analyze(&self, forecast: &[ForecastPoint]) -> Vec<Insight> {
        let mut insights: Vec<Insight> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let insight = rule.evaluate(forecast);
                if let Some(ref found) = insight {
                    tracing::debug!(rule = rule.name(), kind = %found.kind, "Insight rule fired");
                }
                insight
            })
            .collect();

        if insights.is_empty() {
            insights.push(Insight::steady());
        }

        insights
    }

    /// Like [`analyze`](Self::analyze) but only the messages
    pub fn messages(&self, forecast: &[ForecastPoint]) -> Vec<String> {
        self.analyze(forecast)
            .into_iter()
            .map(|i| i.message)
            .collect()
    }

    /// Names of the registered rules, in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::InsightKind;

    fn point(month: &str, income: f64, expense: f64) -> ForecastPoint {
        ForecastPoint {
            month: month.parse().unwrap(),
            predicted_income: income,
            predicted_expense: expense,
            predicted_profit: income - expense,
        }
    }

    #[test]
    fn test_engine_rule_order() {
        let engine = InsightEngine::new();
        assert_eq!(
            engine.rule_names(),
            vec!["Income Trend", "Expense Trend", "Profit Margin", "Cash Flow Risk"]
        );
    }

    #[test]
    fn test_empty_forecast_gets_steady_note() {
        let insights = InsightEngine::new().analyze(&[]);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Steady);
    }

    #[test]
    fn test_flat_twenty_percent_margin_is_steady() {
        let forecast = vec![
            point("2024-03", 100_000.0, 80_000.0),
            point("2024-04", 100_000.0, 80_000.0),
            point("2024-05", 100_000.0, 80_000.0),
        ];
        let messages = InsightEngine::new().messages(&forecast);
        assert_eq!(
            messages,
            vec!["Maintain current financial practices. Monitor trends regularly."]
        );
    }

    #[test]
    fn test_multiple_rules_fire_in_order() {
        // Income falls 50%, expenses double, losses in later months
        let forecast = vec![
            point("2024-03", 100.0, 50.0),
            point("2024-04", 75.0, 75.0),
            point("2024-05", 50.0, 100.0),
        ];
        let kinds: Vec<InsightKind> = InsightEngine::new()
            .analyze(&forecast)
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                InsightKind::IncomeDecline,
                InsightKind::ExpenseGrowth,
                InsightKind::LowMargin,
                InsightKind::CashFlowRisk,
            ]
        );
    }

    struct AlwaysRule;

    impl InsightRule for AlwaysRule {
        fn name(&self) -> &'static str {
            "Always"
        }

        fn evaluate(&self, _forecast: &[ForecastPoint]) -> Option<Insight> {
            Some(Insight::new(InsightKind::Steady, "custom"))
        }
    }

    #[test]
    fn test_registered_rule_suppresses_steady_note() {
        let mut engine = InsightEngine { rules: vec![] };
        engine.register(Box::new(AlwaysRule));
        assert_eq!(engine.messages(&[]), vec!["custom"]);
    }
}
