//! Insight Engine - qualitative statements derived from a forecast
//!
//! Rules are evaluated in a fixed order and each appends at most one
//! insight. When no rule fires the engine emits a single "steady" note, so
//! the result is never empty.
//!
//! ## Built-in Rules
//!
//! - **Income Trend** - growth above 5% or decline beyond 5% across the horizon
//! - **Expense Trend** - expense growth above 10%
//! - **Profit Margin** - average margin below 20% or above 30%
//! - **Cash Flow Risk** - months projected at a loss
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::new();
//! let messages = engine.messages(&forecast);
//! ```

pub mod engine;
pub mod rules;
pub mod types;

pub use engine::{InsightEngine, InsightRule};
pub use rules::{CashFlowRiskRule, ExpenseTrendRule, IncomeTrendRule, ProfitMarginRule};
pub use types::{Insight, InsightKind};
