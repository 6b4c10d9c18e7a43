//! Sets up the application database.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error,
    category::{CategoryName, create_category_table, get_all_categories, get_or_create_category},
    savings_goal::create_savings_goal_table,
    transaction::create_transaction_table,
    user::create_user_table,
};

/// The categories seeded into a fresh database so the transaction form has
/// something to offer before anyone has typed a custom category name.
const DEFAULT_CATEGORIES: [&str; 6] = [
    "Salary",
    "Groceries",
    "Transport",
    "Entertainment",
    "Utilities",
    "Other",
];

/// Create the tables for the application's domain models and seed the default
/// categories.
///
/// All statements run inside a single exclusive SQL transaction, and every
/// table is created with `IF NOT EXISTS`, so calling this on an existing
/// database is a no-op.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_savings_goal_table(&transaction)?;

    if get_all_categories(&transaction)?.is_empty() {
        for name in DEFAULT_CATEGORIES {
            get_or_create_category(CategoryName::new_unchecked(name), &transaction)?;
        }
    }

    transaction.commit()?;

    Ok(())
}
