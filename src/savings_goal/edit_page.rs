//! The page with the form for editing an existing savings goal.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::GoalId,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, base, dollar_input_styles, loading_spinner},
    navigation::NavBar,
    savings_goal::{
        core::get_savings_goal,
        form::{GoalFormDefaults, goal_form_fields},
    },
    user::UserId,
};

/// The state needed to display the edit-goal page.
#[derive(Debug, Clone)]
pub struct EditGoalPageState {
    /// The database connection for reading savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditGoalPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the form for editing the savings goal `goal_id`.
///
/// Responds with the 404 page when the goal does not exist for the current
/// user.
pub async fn get_edit_goal_page(
    State(state): State<EditGoalPageState>,
    Extension(user_id): Extension<UserId>,
    Path(goal_id): Path<GoalId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = get_savings_goal(goal_id, user_id, &connection)?;

    let nav_bar = NavBar::new(endpoints::GOALS_VIEW).into_html();
    let fields = goal_form_fields(&GoalFormDefaults {
        name: &goal.name,
        target_amount: Some(goal.target_amount),
        description: goal.description.as_deref(),
        deadline: goal.deadline,
        progress: Some(goal.progress),
    });
    let put_endpoint = format_endpoint(endpoints::PUT_GOAL, goal.id);

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto max-w-md text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold mb-4" { "Edit Savings Goal" }

            form
                hx-put=(put_endpoint)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                class="space-y-4 w-full"
            {
                (fields)

                button
                    type="submit" id="submit-button" tabindex="0"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" id="indicator"
                    {
                        (loading_spinner())
                    }
                    "Save Changes"
                }
            }
        }
    );

    Ok(base("Edit Savings Goal", &[dollar_input_styles()], &content).into_response())
}
