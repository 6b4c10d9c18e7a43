//! The page listing all of the user's transactions.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::get_all_categories,
    database_id::CategoryId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
    report::UNCATEGORIZED_LABEL,
    transaction::{Transaction, TransactionKind, get_transactions_for_user},
    user::UserId,
};

/// The state needed to display the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the user's transactions, most recent first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let category_names: HashMap<CategoryId, String> = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?
        .into_iter()
        .map(|category| (category.id, category.name.to_string()))
        .collect();

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col px-2 lg:px-6 py-8 mx-auto max-w-screen-lg text-gray-900 dark:text-white"
        {
            div class="flex items-center justify-between mb-4"
            {
                h2 class="text-xl font-bold" { "Transactions" }

                (link(endpoints::NEW_TRANSACTION_VIEW, "Add transaction"))
            }

            @if transactions.is_empty() {
                p
                {
                    "No transactions yet. Add your first one "
                    (link(endpoints::NEW_TRANSACTION_VIEW, "here"))
                    "."
                }
            } @else {
                (transactions_table(&transactions, &category_names))
            }
        }
    );

    Ok(base("Transactions", &[], &content).into_response())
}

fn transactions_table(
    transactions: &[Transaction],
    category_names: &HashMap<CategoryId, String>,
) -> Markup {
    html!(
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(transaction, category_names))
                    }
                }
            }
        }
    )
}

fn transaction_row(
    transaction: &Transaction,
    category_names: &HashMap<CategoryId, String>,
) -> Markup {
    let amount_style = match transaction.kind {
        TransactionKind::Income => "text-green-600 dark:text-green-400",
        TransactionKind::Expense => "text-red-600 dark:text-red-400",
    };
    let sign = match transaction.kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense => "−",
    };
    let category = transaction
        .category_id
        .and_then(|category_id| category_names.get(&category_id))
        .map(String::as_str)
        .unwrap_or(UNCATEGORIZED_LABEL);
    let delete_endpoint = format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }

            td class={(TABLE_CELL_STYLE) " " (amount_style)}
            {
                (sign) (format_currency(transaction.amount))
            }

            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (category) }
            }

            td class=(TABLE_CELL_STYLE) { (transaction.note.as_deref().unwrap_or("")) }

            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    hx-delete=(delete_endpoint)
                    hx-confirm="Delete this transaction?"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        db::initialize,
        test_utils::{assert_valid_html, parse_html_document},
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{TransactionsPageState, get_transactions_page};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[tokio::test]
    async fn lists_transactions_with_delete_buttons() {
        let conn = get_test_connection();
        let user = crate::test_utils::insert_test_user(&conn);

        create_transaction(
            Transaction::build(12.3, TransactionKind::Expense, date!(2024 - 01 - 10)),
            user.id,
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(45.6, TransactionKind::Income, date!(2024 - 01 - 11)),
            user.id,
            &conn,
        )
        .unwrap();

        let state = TransactionsPageState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_transactions_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let row_selector = Selector::parse("tbody tr").unwrap();
        let rows = document.select(&row_selector).count();
        assert_eq!(rows, 2, "want 2 rows, got {rows}");

        let delete_selector = Selector::parse("button[hx-delete]").unwrap();
        let buttons = document.select(&delete_selector).count();
        assert_eq!(buttons, 2, "want 2 delete buttons, got {buttons}");
    }

    #[tokio::test]
    async fn shows_prompt_when_empty() {
        let conn = get_test_connection();
        let user = crate::test_utils::insert_test_user(&conn);
        let state = TransactionsPageState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_transactions_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let table_selector = Selector::parse("table").unwrap();
        assert!(
            document.select(&table_selector).next().is_none(),
            "no table should be rendered without transactions"
        );
    }
}
