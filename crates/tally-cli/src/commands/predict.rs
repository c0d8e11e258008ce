//! Predict command implementation

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tally_core::{
    ForecastConfig, ForecastReport, ForecastService, HttpTransactionSource,
    StaticTransactionSource, TransactionSource, MAX_MONTHS_AHEAD,
};

pub async fn cmd_predict(
    config: &ForecastConfig,
    file: Option<&Path>,
    months_ahead: Option<u32>,
    json: bool,
) -> Result<()> {
    let months_ahead = months_ahead.unwrap_or(config.months_ahead);
    if !(1..=MAX_MONTHS_AHEAD).contains(&months_ahead) {
        bail!("--months-ahead must be between 1 and {}", MAX_MONTHS_AHEAD);
    }

    let source: Box<dyn TransactionSource> = match file {
        Some(path) => Box::new(load_transactions_file(path)?),
        None => Box::new(HttpTransactionSource::from_config(&config.backend)),
    };

    let service = ForecastService::from_config(config).with_months_ahead(months_ahead);
    let report = service
        .predict(source.as_ref(), Utc::now().date_naive())
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    Ok(())
}

/// Read a JSON array of transactions
pub fn load_transactions_file(path: &Path) -> Result<StaticTransactionSource> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    StaticTransactionSource::from_json(&content)
        .with_context(|| format!("{} is not a JSON array of transactions", path.display()))
}

/// Human-readable rendering of a report
pub fn format_report(report: &ForecastReport) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str("📈 Financial Forecast\n");
    if report.model_trained {
        out.push_str(&format!(
            "   Trend model trained on {} month(s)\n",
            report.data_points
        ));
    } else {
        out.push_str("   Estimated projection (not enough history)\n");
    }
    if let Some(ref err) = report.error {
        out.push_str(&format!("   ⚠️  Pipeline error: {}\n", err));
    }
    out.push_str("   ─────────────────────────────────────────────────────────────\n");

    if !report.historical.is_empty() {
        out.push_str("   History\n");
        for h in &report.historical {
            out.push_str(&format!(
                "   {}  income {:>14.2}  expense {:>14.2}  profit {:>14.2}\n",
                h.month, h.income, h.expense, h.profit
            ));
        }
        out.push('\n');
    }

    out.push_str("   Forecast\n");
    for p in &report.predictions {
        out.push_str(&format!(
            "   {}  income {:>14.2}  expense {:>14.2}  profit {:>14.2}\n",
            p.month, p.predicted_income, p.predicted_expense, p.predicted_profit
        ));
    }

    out.push('\n');
    out.push_str("   Insights\n");
    for insight in &report.insights {
        out.push_str(&format!("   • {}\n", insight));
    }

    out
}
