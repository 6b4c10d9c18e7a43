//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{CategoryId, TransactionId},
    user::UserId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction records money earned or money spent.
///
/// The amount of a transaction is always stored as a positive magnitude; the
/// kind carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(()),
        }
    }
}

impl rusqlite::ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned in this transaction. Always positive.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: Date,
    /// An optional free-text note about the transaction.
    pub note: Option<String>,
    /// The ID of the category the transaction belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// The user that owns this transaction.
    pub user_id: UserId,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, kind: TransactionKind, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            kind,
            date,
            note: None,
            category_id: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The note and category are optional and default to `None`. The owning user
/// is supplied at insert time by [create_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The magnitude of the transaction in dollars.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    pub kind: TransactionKind,
    /// The date when the transaction occurred.
    pub date: Date,
    /// An optional free-text note about the transaction.
    pub note: Option<String>,
    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category_id: Option<CategoryId>,
}

impl TransactionBuilder {
    /// Set the note for the transaction.
    pub fn note(mut self, note: Option<&str>) -> Self {
        self.note = note.map(|note| note.to_owned());
        self
    }

    /// Set the category id for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction owned by `user_id` in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the specified category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, kind, date, note, category_id, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, amount, kind, date, note, category_id, user_id",
        )?
        .query_row(
            (
                builder.amount,
                builder.kind,
                builder.date,
                builder.note,
                builder.category_id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(builder.category_id),
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve a transaction owned by `user_id` from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, amount, kind, date, note, category_id, user_id
             FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve all transactions owned by `user_id`, most recent first.
///
/// Rows are ordered by date descending with ties broken by insertion order,
/// so the first entries are the ones to show in "recent" lists.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_for_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, amount, kind, date, note, category_id, user_id
             FROM \"transaction\" WHERE user_id = :user_id
             ORDER BY date DESC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}

/// Delete the transaction `id` if it is owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                kind TEXT NOT NULL,
                date TEXT NOT NULL,
                note TEXT,
                category_id INTEGER,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Add composite index used by the dashboard and insights pages.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let kind = row.get(2)?;
    let date = row.get(3)?;
    let note = row.get(4)?;
    let category_id = row.get(5)?;
    let user_id = UserId::new(row.get(6)?);

    Ok(Transaction {
        id,
        amount,
        kind,
        date,
        note,
        category_id,
        user_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, get_or_create_category},
        db::initialize,
        transaction::{
            Transaction, TransactionKind, create_transaction, delete_transaction,
            get_transaction, get_transactions_for_user,
        },
        user::UserId,
    };

    use crate::test_utils::insert_test_user;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let user = insert_test_user(&conn);
        let amount = 12.3;

        let result = create_transaction(
            Transaction::build(amount, TransactionKind::Expense, date!(2025 - 10 - 05)),
            user.id,
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.kind, TransactionKind::Expense);
                assert_eq!(transaction.user_id, user.id);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let conn = get_test_connection();
        let user = insert_test_user(&conn);
        let category_id = Some(999);

        let result = create_transaction(
            Transaction::build(123.45, TransactionKind::Expense, date!(2025 - 10 - 04))
                .category_id(category_id),
            user.id,
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCategory(category_id)));
    }

    #[test]
    fn create_stores_note_and_category() {
        let conn = get_test_connection();
        let user = insert_test_user(&conn);
        let category =
            get_or_create_category(CategoryName::new_unchecked("Groceries"), &conn).unwrap();

        let transaction = create_transaction(
            Transaction::build(42.0, TransactionKind::Expense, date!(2025 - 10 - 04))
                .note(Some("weekly shop"))
                .category_id(Some(category.id)),
            user.id,
            &conn,
        )
        .unwrap();

        let selected = get_transaction(transaction.id, user.id, &conn).unwrap();
        assert_eq!(selected.note.as_deref(), Some("weekly shop"));
        assert_eq!(selected.category_id, Some(category.id));
    }

    #[test]
    fn get_transaction_is_scoped_to_owner() {
        let conn = get_test_connection();
        let owner = insert_test_user(&conn);

        let transaction = create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 10 - 04)),
            owner.id,
            &conn,
        )
        .unwrap();

        let other_user = UserId::new(owner.id.as_i64() + 1);
        let result = get_transaction(transaction.id, other_user, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_transactions_for_user_orders_by_date_descending() {
        let conn = get_test_connection();
        let user = insert_test_user(&conn);

        create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 01 - 15)),
            user.id,
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(2.0, TransactionKind::Income, date!(2025 - 03 - 01)),
            user.id,
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(3.0, TransactionKind::Income, date!(2025 - 02 - 10)),
            user.id,
            &conn,
        )
        .unwrap();

        let amounts: Vec<f64> = get_transactions_for_user(user.id, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.amount)
            .collect();

        assert_eq!(amounts, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn get_transactions_for_user_excludes_other_users() {
        let conn = get_test_connection();
        let user_a = insert_test_user(&conn);
        let user_b = crate::test_utils::insert_test_user_with_email(&conn, "other@example.com");

        create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 01 - 15)),
            user_a.id,
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(2.0, TransactionKind::Income, date!(2025 - 01 - 16)),
            user_b.id,
            &conn,
        )
        .unwrap();

        let transactions = get_transactions_for_user(user_a.id, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].user_id, user_a.id);
    }

    #[test]
    fn delete_transaction_succeeds() {
        let conn = get_test_connection();
        let user = insert_test_user(&conn);
        let transaction = create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 01 - 15)),
            user.id,
            &conn,
        )
        .unwrap();

        delete_transaction(transaction.id, user.id, &conn).unwrap();

        assert_eq!(
            get_transaction(transaction.id, user.id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_transaction_fails_for_other_users_transaction() {
        let conn = get_test_connection();
        let owner = insert_test_user(&conn);
        let transaction = create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 01 - 15)),
            owner.id,
            &conn,
        )
        .unwrap();

        let other_user = UserId::new(owner.id.as_i64() + 1);
        let result = delete_transaction(transaction.id, other_user, &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));

        // The owner can still see the transaction.
        assert!(get_transaction(transaction.id, owner.id, &conn).is_ok());
    }
}
