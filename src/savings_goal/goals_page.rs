//! The page listing the user's savings goals.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{BUTTON_DELETE_STYLE, base, format_currency, link},
    navigation::NavBar,
    savings_goal::{SavingsGoal, get_savings_goals_for_user},
    user::UserId,
};

/// The state needed to display the savings goals page.
#[derive(Debug, Clone)]
pub struct GoalsPageState {
    /// The database connection for reading savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the user's savings goals with their progress.
pub async fn get_goals_page(
    State(state): State<GoalsPageState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goals = get_savings_goals_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get savings goals: {error}"))?;

    let nav_bar = NavBar::new(endpoints::GOALS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col px-2 lg:px-6 py-8 mx-auto max-w-screen-lg text-gray-900 dark:text-white"
        {
            div class="flex items-center justify-between mb-4"
            {
                h2 class="text-xl font-bold" { "Savings Goals" }

                (link(endpoints::NEW_GOAL_VIEW, "Add goal"))
            }

            @if goals.is_empty() {
                p
                {
                    "No savings goals yet. Create your first one "
                    (link(endpoints::NEW_GOAL_VIEW, "here"))
                    ", or get inspiration on the "
                    (link(endpoints::INSIGHTS_VIEW, "insights page"))
                    "."
                }
            } @else {
                div class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    @for goal in &goals {
                        (goal_card(goal))
                    }
                }
            }
        }
    );

    Ok(base("Savings Goals", &[], &content).into_response())
}

fn goal_card(goal: &SavingsGoal) -> Markup {
    let edit_endpoint = format_endpoint(endpoints::EDIT_GOAL_VIEW, goal.id);
    let delete_endpoint = format_endpoint(endpoints::DELETE_GOAL, goal.id);
    let percent = goal.progress_percent();

    html!(
        div class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            div class="flex items-center justify-between mb-2"
            {
                h3 class="text-lg font-semibold" { (goal.name) }

                span class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (format_currency(goal.progress)) " / " (format_currency(goal.target_amount))
                }
            }

            @if let Some(description) = &goal.description {
                p class="text-sm text-gray-600 dark:text-gray-400 mb-2" { (description) }
            }

            div class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700 mb-2"
            {
                div
                    class="bg-blue-600 h-2.5 rounded-full"
                    style=(format!("width: {percent:.0}%"))
                {}
            }

            div class="flex items-center justify-between text-sm"
            {
                @if let Some(deadline) = goal.deadline {
                    span class="text-gray-500 dark:text-gray-400" { "By " (deadline) }
                } @else {
                    span {}
                }

                div class="flex gap-4"
                {
                    (link(&edit_endpoint, "Edit"))

                    button
                        type="button"
                        hx-delete=(delete_endpoint)
                        hx-confirm="Delete this savings goal?"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}
