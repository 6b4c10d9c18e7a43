//! The read-only JSON endpoint for the expense breakdown by category.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    report::{aggregation::category_breakdown, get_entries_for_user},
    user::UserId,
};

/// The state needed to compute the category breakdown.
#[derive(Debug, Clone)]
pub struct CategoryBreakdownState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryBreakdownState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Return the current user's summed expense amounts keyed by category name.
///
/// Transactions without a category are reported under "Uncategorized".
pub async fn get_category_breakdown(
    State(state): State<CategoryBreakdownState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<HashMap<String, f64>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = get_entries_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(Json(category_breakdown(&entries)))
}
