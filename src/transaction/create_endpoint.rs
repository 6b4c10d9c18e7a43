//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    alert::AlertTemplate,
    category::{CategoryName, get_or_create_category},
    database_id::CategoryId,
    endpoints,
    timezone::get_local_offset,
    transaction::{Transaction, TransactionKind, core::create_transaction},
    user::UserId,
};

use super::create_page::NEW_CATEGORY_OPTION;

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The value of the transaction in dollars. Always a magnitude, the kind
    /// carries the sign.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    pub kind: TransactionKind,
    /// The date when the transaction occurred. Defaults to today.
    #[serde(default)]
    pub date: Option<Date>,
    /// Optional free text describing the transaction.
    #[serde(default)]
    pub note: Option<String>,
    /// The selected category: empty for none, a category ID, or the
    /// new-category marker.
    #[serde(default)]
    pub category: Option<String>,
    /// The name for a category to create, used with the new-category marker.
    #[serde(default)]
    pub new_category: Option<String>,
}

/// Resolve the category selection of the form into a category ID, lazily
/// creating a category when the user typed a new name.
///
/// An empty new-category name is treated the same as "no category".
fn resolve_category_id(
    form: &TransactionForm,
    connection: &Connection,
) -> Result<Option<CategoryId>, Error> {
    let selection = match form.category.as_deref() {
        None | Some("") => return Ok(None),
        Some(selection) => selection,
    };

    if selection == NEW_CATEGORY_OPTION {
        let name = form.new_category.as_deref().unwrap_or_default().trim();

        if name.is_empty() {
            return Ok(None);
        }

        let category = get_or_create_category(CategoryName::new(name)?, connection)?;
        return Ok(Some(category.id));
    }

    selection
        .parse::<CategoryId>()
        .map(Some)
        .map_err(|_| Error::InvalidCategory(None))
}

/// A route handler for creating a new transaction, redirects to the
/// transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let Some(local_timezone) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    if !(form.amount > 0.0) {
        return AlertTemplate::error(
            "Invalid amount",
            "The transaction amount must be greater than zero.",
        )
        .into_response(StatusCode::BAD_REQUEST);
    }

    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();
    let date = form.date.unwrap_or(today);

    if date > today {
        tracing::error!(
            "Tried to perform an operation with a future date (e.g., create a transaction)"
        );

        return Error::FutureDate(date).into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let category_id = match resolve_category_id(&form, &connection) {
        Ok(category_id) => category_id,
        Err(error) => {
            tracing::error!("could not resolve category: {error}");
            return error.into_alert_response();
        }
    };

    let note = form
        .note
        .as_deref()
        .map(str::trim)
        .filter(|note| !note.is_empty());
    let builder = Transaction::build(form.amount, form.kind, date)
        .note(note)
        .category_id(category_id);

    if let Err(error) = create_transaction(builder, user_id, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::{CategoryName, get_all_categories, get_or_create_category},
        db::initialize,
        test_utils::insert_test_user,
        transaction::{
            TransactionKind,
            create_endpoint::{CreateTransactionState, TransactionForm},
            create_transaction_endpoint, get_transaction,
        },
        user::User,
    };

    fn get_test_state() -> (CreateTransactionState, User) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = insert_test_user(&conn);

        (
            CreateTransactionState {
                db_connection: Arc::new(Mutex::new(conn)),
                local_timezone: "Etc/UTC".to_owned(),
            },
            user,
        )
    }

    fn empty_form() -> TransactionForm {
        TransactionForm {
            amount: 12.3,
            kind: TransactionKind::Expense,
            date: Some(date!(2024 - 01 - 10)),
            note: None,
            category: None,
            new_category: None,
        }
    }

    #[track_caller]
    fn assert_redirects_to_transactions_view(response: &axum::response::Response) {
        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(
            location, "/transactions",
            "got redirect to {location:?}, want redirect to /transactions"
        );
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (state, user) = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Extension(user.id),
            Form(empty_form()),
        )
        .await
        .into_response();

        assert_redirects_to_transactions_view(&response);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, user.id, &connection).unwrap();
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.category_id, None);
    }

    #[tokio::test]
    async fn can_create_transaction_with_existing_category() {
        let (state, user) = get_test_state();
        let category_id = {
            let connection = state.db_connection.lock().unwrap();
            get_or_create_category(CategoryName::new_unchecked("Groceries"), &connection)
                .unwrap()
                .id
        };

        let form = TransactionForm {
            category: Some(category_id.to_string()),
            ..empty_form()
        };
        let response =
            create_transaction_endpoint(State(state.clone()), Extension(user.id), Form(form))
                .await
                .into_response();

        assert_redirects_to_transactions_view(&response);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, user.id, &connection).unwrap();
        assert_eq!(transaction.category_id, Some(category_id));
    }

    #[tokio::test]
    async fn creates_new_category_lazily() {
        let (state, user) = get_test_state();

        let form = TransactionForm {
            category: Some("new".to_owned()),
            new_category: Some("Subscriptions".to_owned()),
            ..empty_form()
        };
        let response =
            create_transaction_endpoint(State(state.clone()), Extension(user.id), Form(form))
                .await
                .into_response();

        assert_redirects_to_transactions_view(&response);

        let connection = state.db_connection.lock().unwrap();
        let categories = get_all_categories(&connection).unwrap();
        assert!(
            categories
                .iter()
                .any(|category| category.name.as_ref() == "Subscriptions"),
            "expected the new category to have been created"
        );

        let transaction = get_transaction(1, user.id, &connection).unwrap();
        assert!(transaction.category_id.is_some());
    }

    #[tokio::test]
    async fn empty_new_category_name_means_uncategorized() {
        let (state, user) = get_test_state();

        let form = TransactionForm {
            category: Some("new".to_owned()),
            new_category: Some("   ".to_owned()),
            ..empty_form()
        };
        let response =
            create_transaction_endpoint(State(state.clone()), Extension(user.id), Form(form))
                .await
                .into_response();

        assert_redirects_to_transactions_view(&response);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, user.id, &connection).unwrap();
        assert_eq!(transaction.category_id, None);
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let (state, user) = get_test_state();

        let form = TransactionForm {
            amount: 0.0,
            ..empty_form()
        };
        let response =
            create_transaction_endpoint(State(state.clone()), Extension(user.id), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert!(
            get_transaction(1, user.id, &connection).is_err(),
            "no transaction should have been created"
        );
    }

    #[tokio::test]
    async fn rejects_future_date() {
        let (state, user) = get_test_state();

        let form = TransactionForm {
            date: Some(date!(2999 - 01 - 01)),
            ..empty_form()
        };
        let response =
            create_transaction_endpoint(State(state.clone()), Extension(user.id), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_date_defaults_to_today() {
        let (state, user) = get_test_state();

        let form = TransactionForm {
            date: None,
            ..empty_form()
        };
        let response =
            create_transaction_endpoint(State(state.clone()), Extension(user.id), Form(form))
                .await
                .into_response();

        assert_redirects_to_transactions_view(&response);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, user.id, &connection).unwrap();
        assert_eq!(
            transaction.date,
            time::OffsetDateTime::now_utc().date(),
            "transaction date should default to today"
        );
    }
}
