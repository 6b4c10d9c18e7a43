//! Database queries for retrieving the transaction snapshot used by the
//! aggregation and advice functions.
//!
//! This is a simplified transaction view, separate from the main Transaction
//! domain model, because summaries only need the amount, kind, date, and the
//! resolved category label.

use rusqlite::Connection;
use time::Date;

use crate::{Error, transaction::TransactionKind, user::UserId};

/// The label under which transactions without a category are aggregated.
pub(crate) const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// A single transaction as seen by the aggregation functions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry {
    /// The amount of money spent or earned. Always positive; the kind carries the sign.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: Date,
    /// The name of the transaction's category, or [UNCATEGORIZED_LABEL].
    pub category: String,
}

/// Gets the transaction snapshot for `user_id`, most recent first.
///
/// Rows are ordered by date descending with ties broken by insertion order,
/// so the first entries are the ones to show in "recent" lists. Transactions
/// without a category get the [UNCATEGORIZED_LABEL] label.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub(crate) fn get_entries_for_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Entry>, Error> {
    let query = format!(
        "SELECT
            t.amount,
            t.kind,
            t.date,
            COALESCE(c.name, '{UNCATEGORIZED_LABEL}') AS category
        FROM \"transaction\" t
        LEFT JOIN category c ON c.id = t.category_id
        WHERE t.user_id = :user_id
        ORDER BY t.date DESC, t.id ASC"
    );

    connection
        .prepare(&query)?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            Ok(Entry {
                amount: row.get(0)?,
                kind: row.get(1)?,
                date: row.get(2)?,
                category: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<Entry>, rusqlite::Error>>()
        .map_err(|error| error.into())
}
