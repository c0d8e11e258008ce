//! Monthly aggregation of raw transactions

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{MonthlyBucket, RawTransaction, Transaction, TransactionType, YearMonth};

/// Group transactions into one income/expense bucket per calendar month.
///
/// Malformed records are skipped. Only months that have at least one valid
/// record get a bucket; a missing side of a month is zero. Buckets come back
/// in ascending month order with `sequence_index` 0..N-1.
pub fn aggregate_monthly(transactions: &[RawTransaction]) -> Vec<MonthlyBucket> {
    // month -> (income, expense)
    let mut totals: BTreeMap<YearMonth, (f64, f64)> = BTreeMap::new();
    let mut skipped = 0usize;

    for raw in transactions {
        let Some(tx) = Transaction::from_raw(raw) else {
            skipped += 1;
            continue;
        };

        let entry = totals
            .entry(YearMonth::from_date(tx.date))
            .or_insert((0.0, 0.0));
        match tx.kind {
            TransactionType::Income => entry.0 += tx.amount,
            TransactionType::Expense => entry.1 += tx.amount,
        }
    }

    if skipped > 0 {
        debug!(
            skipped,
            total = transactions.len(),
            "Skipped malformed transactions"
        );
    }

    totals
        .into_iter()
        .enumerate()
        .map(
            |(sequence_index, (month, (income_total, expense_total)))| MonthlyBucket {
                month,
                income_total,
                expense_total,
                sequence_index,
            },
        )
        .collect()
}
