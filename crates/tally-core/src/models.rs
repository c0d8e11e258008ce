//! Domain models for Tally

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    /// Only the exact lowercase spellings are accepted.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as delivered by the finance backend.
///
/// Every field is optional so one bad record never poisons the whole
/// response; validation happens in [`Transaction::from_raw`]. Unknown fields
/// (category, description, account, status, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub amount: Option<f64>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_lenient_string"
    )]
    pub kind: Option<String>,
}

impl RawTransaction {
    pub fn new(date: &str, amount: f64, kind: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            amount: Some(amount),
            kind: Some(kind.to_string()),
        }
    }
}

fn deserialize_lenient_string<'de, D>(d: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(d)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

fn deserialize_lenient_amount<'de, D>(d: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(d)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// A validated transaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub kind: TransactionType,
}

impl Transaction {
    /// Validate a raw record. Returns `None` for anything malformed: a
    /// missing or unparseable date, a missing, non-finite or negative
    /// amount, or a type other than `income`/`expense`.
    pub fn from_raw(raw: &RawTransaction) -> Option<Self> {
        let date = parse_transaction_date(raw.date.as_deref()?)?;
        let amount = raw.amount.filter(|a| a.is_finite() && *a >= 0.0)?;
        let kind = raw.kind.as_deref()?.parse::<TransactionType>().ok()?;
        Some(Self { date, amount, kind })
    }
}

/// Parse a backend date into a calendar date.
///
/// Accepts RFC 3339 timestamps (converted to UTC), naive timestamps with a
/// `T` or space separator, and plain `YYYY-MM-DD` dates.
pub fn parse_transaction_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// A calendar month, ordered chronologically and displayed as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a year-month; `month` is 1-based
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Advance by `n` calendar months, `None` on year overflow
    pub fn checked_add_months(self, n: u32) -> Option<Self> {
        let total = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(n);
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
        Some(Self { year, month })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid month: {}", s))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| format!("Invalid month: {}", s))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| format!("Invalid month: {}", s))?;
        Self::new(year, month).ok_or_else(|| format!("Invalid month: {}", s))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Income and expense totals for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: YearMonth,
    pub income_total: f64,
    pub expense_total: f64,
    /// Zero-based position in the ascending month sequence; the trend regressor
    pub sequence_index: usize,
}

impl MonthlyBucket {
    pub fn profit(&self) -> f64 {
        self.income_total - self.expense_total
    }
}

/// One projected month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: YearMonth,
    pub predicted_income: f64,
    pub predicted_expense: f64,
    pub predicted_profit: f64,
}

/// Read view of a monthly bucket for charting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub month: YearMonth,
    pub income: f64,
    pub expense: f64,
    pub profit: f64,
}

impl From<&MonthlyBucket> for HistoricalPoint {
    fn from(bucket: &MonthlyBucket) -> Self {
        Self {
            month: bucket.month,
            income: bucket.income_total,
            expense: bucket.expense_total,
            profit: bucket.profit(),
        }
    }
}

/// Full result of one forecast run, as returned to API clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub success: bool,
    pub predictions: Vec<ForecastPoint>,
    pub insights: Vec<String>,
    pub historical: Vec<HistoricalPoint>,
    pub model_trained: bool,
    pub data_points: usize,
    /// Cause of a degraded run; the report still carries a usable forecast
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parsing_is_exact() {
        assert_eq!(
            "income".parse::<TransactionType>().unwrap(),
            TransactionType::Income
        );
        assert_eq!(
            "expense".parse::<TransactionType>().unwrap(),
            TransactionType::Expense
        );
        assert!("Income".parse::<TransactionType>().is_err());
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_parse_transaction_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_transaction_date("2024-03-05"), Some(expected));
        assert_eq!(
            parse_transaction_date("2024-03-05T10:00:00.000Z"),
            Some(expected)
        );
        assert_eq!(
            parse_transaction_date("2024-03-05T10:00:00"),
            Some(expected)
        );
        assert_eq!(
            parse_transaction_date("2024-03-05 10:00:00"),
            Some(expected)
        );
        assert_eq!(parse_transaction_date("05/03/2024"), None);
        assert_eq!(parse_transaction_date("not a date"), None);
    }

    #[test]
    fn test_rfc3339_offset_converts_to_utc() {
        // 23:30 at -05:00 is already the next day in UTC
        assert_eq!(
            parse_transaction_date("2024-01-31T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
    }

    #[test]
    fn test_raw_transaction_ignores_extra_fields() {
        let json = r#"{
            "_id": "65f0c0ffee",
            "type": "income",
            "category": "Sales",
            "description": "Invoice 42",
            "amount": 1250.5,
            "account": "Main",
            "date": "2024-03-05T00:00:00.000Z",
            "status": "completed"
        }"#;
        let raw: RawTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(raw.kind.as_deref(), Some("income"));
        assert_eq!(raw.amount, Some(1250.5));

        let tx = Transaction::from_raw(&raw).unwrap();
        assert_eq!(tx.kind, TransactionType::Income);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_raw_transaction_tolerates_wrong_types() {
        let json = r#"[
            {"type": "expense", "amount": "99.5", "date": "2024-01-02"},
            {"type": 7, "amount": {"$numberDecimal": "1"}, "date": null},
            {}
        ]"#;
        let raws: Vec<RawTransaction> = serde_json::from_str(json).unwrap();
        assert_eq!(raws.len(), 3);
        assert_eq!(raws[0].amount, Some(99.5));
        assert_eq!(raws[1], RawTransaction::default());
        assert!(Transaction::from_raw(&raws[0]).is_some());
        assert!(Transaction::from_raw(&raws[1]).is_none());
        assert!(Transaction::from_raw(&raws[2]).is_none());
    }

    #[test]
    fn test_negative_amount_is_malformed() {
        let raw = RawTransaction::new("2024-01-02", -10.0, "expense");
        assert!(Transaction::from_raw(&raw).is_none());
    }

    #[test]
    fn test_year_month_arithmetic() {
        let nov = YearMonth::new(2024, 11).unwrap();
        assert_eq!(nov.checked_add_months(1).unwrap().to_string(), "2024-12");
        assert_eq!(nov.checked_add_months(2).unwrap().to_string(), "2025-01");
        assert_eq!(nov.checked_add_months(26).unwrap().to_string(), "2027-01");
        assert!(YearMonth::new(i32::MAX, 12)
            .unwrap()
            .checked_add_months(1)
            .is_none());
        assert!(YearMonth::new(2024, 13).is_none());
    }

    #[test]
    fn test_year_month_ordering_and_serde() {
        let a: YearMonth = "2023-12".parse().unwrap();
        let b: YearMonth = "2024-01".parse().unwrap();
        assert!(a < b);
        assert_eq!(serde_json::to_string(&b).unwrap(), "\"2024-01\"");
        let back: YearMonth = serde_json::from_str("\"2024-01\"").unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn test_report_omits_absent_error() {
        let report = ForecastReport {
            success: true,
            predictions: vec![],
            insights: vec!["x".to_string()],
            historical: vec![],
            model_trained: false,
            data_points: 0,
            error: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["success"], true);
    }
}
