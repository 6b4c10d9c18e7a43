//! Pure aggregation functions over a transaction snapshot.
//!
//! Every function here is a stateless transform of a borrowed [Entry] slice;
//! callers fetch the snapshot once per request and derive totals, category
//! breakdowns and the monthly time series from it.

use std::collections::{BTreeMap, HashMap};

use time::{Date, Month};

use crate::{report::Entry, transaction::TransactionKind};

/// How many entries the dashboard shows in its recent-transactions list.
pub(crate) const RECENT_COUNT: usize = 8;

/// How many months of history the monthly series covers.
pub(crate) const MONTHLY_SERIES_WINDOW: usize = 6;

/// Summed income and expenses with their difference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Sums entry amounts by kind. Empty input yields all zeros.
pub(crate) fn totals(entries: &[Entry]) -> Totals {
    let mut income = 0.0;
    let mut expense = 0.0;

    for entry in entries {
        match entry.kind {
            TransactionKind::Income => income += entry.amount,
            TransactionKind::Expense => expense += entry.amount,
        }
    }

    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

/// The first `n` entries of the snapshot.
///
/// The snapshot is already sorted by date descending with ties in insertion
/// order (see [super::get_entries_for_user]), so these are the most recent
/// transactions.
pub(crate) fn recent(entries: &[Entry], n: usize) -> &[Entry] {
    &entries[..n.min(entries.len())]
}

/// Sums expense amounts by category label. Income entries do not contribute.
///
/// The key order is unspecified; use [sorted_category_spending] when the
/// display order matters.
pub(crate) fn category_breakdown(entries: &[Entry]) -> HashMap<String, f64> {
    let mut sums = HashMap::new();

    for entry in entries {
        if entry.kind == TransactionKind::Expense {
            *sums.entry(entry.category.clone()).or_insert(0.0) += entry.amount;
        }
    }

    sums
}

/// Expense totals per category, highest first.
///
/// The sort is stable over the order categories first appear in `entries`,
/// so categories with equal totals keep their first-encountered order.
pub(crate) fn sorted_category_spending(entries: &[Entry]) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<&str, f64> = HashMap::new();

    for entry in entries {
        if entry.kind != TransactionKind::Expense {
            continue;
        }

        if !sums.contains_key(entry.category.as_str()) {
            order.push(entry.category.clone());
        }

        *sums.entry(entry.category.as_str()).or_insert(0.0) += entry.amount;
    }

    let mut spending: Vec<(String, f64)> = order
        .iter()
        .map(|category| (category.clone(), sums[category.as_str()]))
        .collect();
    spending.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    spending
}

/// The `YYYY-MM` bucket key for a date.
///
/// Zero-padding the month makes the lexicographic order of keys equal to
/// their chronological order.
pub(crate) fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), date.month() as u8)
}

/// Net amount (income minus expenses) per month for the most recent `window`
/// months present in the data, in chronological order.
///
/// Months without any transactions are not synthesized; if fewer than
/// `window` distinct months exist, all of them are returned.
pub(crate) fn monthly_series(entries: &[Entry], window: usize) -> Vec<(String, f64)> {
    let mut monthly: BTreeMap<String, f64> = BTreeMap::new();

    for entry in entries {
        let signed_amount = match entry.kind {
            TransactionKind::Income => entry.amount,
            TransactionKind::Expense => -entry.amount,
        };

        *monthly.entry(month_key(entry.date)).or_insert(0.0) += signed_amount;
    }

    let skip = monthly.len().saturating_sub(window);

    monthly.into_iter().skip(skip).collect()
}

/// The number of unique months across all entries, regardless of kind.
pub(crate) fn distinct_month_count(entries: &[Entry]) -> usize {
    let months: std::collections::HashSet<String> =
        entries.iter().map(|entry| month_key(entry.date)).collect();

    months.len()
}

/// The user's monthly income, estimated from the data when the profile does
/// not provide one.
///
/// A profile value greater than zero is returned verbatim. Otherwise the
/// total income is averaged over the distinct months present in the data,
/// with a floor of one month so an empty snapshot yields zero rather than a
/// division fault.
pub(crate) fn estimated_monthly_income(entries: &[Entry], profile_monthly_income: f64) -> f64 {
    if profile_monthly_income > 0.0 {
        return profile_monthly_income;
    }

    let total_income = totals(entries).income;

    total_income / distinct_month_count(entries).max(1) as f64
}

/// The percentage of monthly income not consumed by expenses.
///
/// Not clamped: the rate is negative when expenses exceed income and can
/// exceed 100 when expenses are negative contributions. A zero income yields
/// zero rather than a division fault.
pub(crate) fn savings_rate(monthly_income: f64, total_expense: f64) -> f64 {
    if monthly_income == 0.0 {
        return 0.0;
    }

    (monthly_income - total_expense) / monthly_income * 100.0
}

/// Expense sums for the month of `reference` and for the immediately
/// preceding calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct ExpenseDelta {
    pub current_month: f64,
    pub previous_month: f64,
}

/// Sums expenses dated in the calendar month of `reference` and in the month
/// before it, wrapping January back to December of the prior year. The caller
/// compares the two sums.
pub(crate) fn month_over_month_expense_delta(entries: &[Entry], reference: Date) -> ExpenseDelta {
    let current = (reference.year(), reference.month());
    let previous = match reference.month() {
        Month::January => (reference.year() - 1, Month::December),
        month => (reference.year(), month.previous()),
    };

    let mut delta = ExpenseDelta::default();

    for entry in entries {
        if entry.kind != TransactionKind::Expense {
            continue;
        }

        let entry_month = (entry.date.year(), entry.date.month());
        if entry_month == current {
            delta.current_month += entry.amount;
        } else if entry_month == previous {
            delta.previous_month += entry.amount;
        }
    }

    delta
}
