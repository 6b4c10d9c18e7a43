//! Defines the endpoint for creating a new savings goal.

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

use crate::{
    AppState, Error, endpoints,
    savings_goal::{core::create_savings_goal, form::GoalForm},
    user::UserId,
};

/// The state needed to create a savings goal.
#[derive(Debug, Clone)]
pub struct CreateGoalState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new savings goal, redirects to the goals
/// view on success.
pub async fn create_goal_endpoint(
    State(state): State<CreateGoalState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<GoalForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_savings_goal(form.into_fields(), user_id, &connection) {
        tracing::error!("could not create savings goal: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::GOALS_VIEW.to_owned()),
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

    use crate::{
        db::initialize,
        savings_goal::{form::GoalForm, get_savings_goals_for_user},
        test_utils::insert_test_user,
        user::User,
    };

    use super::{CreateGoalState, create_goal_endpoint};

    fn get_test_state() -> (CreateGoalState, User) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = insert_test_user(&conn);

        (
            CreateGoalState {
                db_connection: Arc::new(Mutex::new(conn)),
            },
            user,
        )
    }

    #[tokio::test]
    async fn creates_goal_and_redirects() {
        let (state, user) = get_test_state();

        let form = GoalForm {
            name: "Emergency Fund".to_owned(),
            target_amount: 6000.0,
            description: Some("Six months of expenses".to_owned()),
            deadline: None,
            progress: None,
        };

        let response = create_goal_endpoint(State(state.clone()), Extension(user.id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(HX_REDIRECT).unwrap(), "/goals");

        let connection = state.db_connection.lock().unwrap();
        let goals = get_savings_goals_for_user(user.id, &connection).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].name, "Emergency Fund");
        assert_eq!(goals[0].progress, 0.0);
    }

    #[tokio::test]
    async fn rejects_goal_without_positive_target() {
        let (state, user) = get_test_state();

        let form = GoalForm {
            name: "Emergency Fund".to_owned(),
            target_amount: 0.0,
            description: None,
            deadline: None,
            progress: None,
        };

        let response = create_goal_endpoint(State(state.clone()), Extension(user.id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        let goals = get_savings_goals_for_user(user.id, &connection).unwrap();
        assert!(goals.is_empty(), "no goal should have been created");
    }
}
