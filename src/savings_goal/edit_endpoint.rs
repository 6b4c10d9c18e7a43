//! Defines the endpoint for updating an existing savings goal.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::GoalId,
    endpoints,
    savings_goal::{core::update_savings_goal, form::GoalForm},
    user::UserId,
};

/// The state needed to update a savings goal.
#[derive(Debug, Clone)]
pub struct UpdateGoalState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating the savings goal `goal_id`, redirects to the
/// goals view on success.
pub async fn update_goal_endpoint(
    State(state): State<UpdateGoalState>,
    Extension(user_id): Extension<UserId>,
    Path(goal_id): Path<GoalId>,
    Form(form): Form<GoalForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = update_savings_goal(goal_id, form.into_fields(), user_id, &connection) {
        tracing::error!("could not update savings goal: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::GOALS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
