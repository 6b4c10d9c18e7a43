//! The page with the form for creating a new savings goal.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, dollar_input_styles, loading_spinner},
    navigation::NavBar,
    savings_goal::form::{GoalFormDefaults, goal_form_fields},
};

/// Display the form for creating a new savings goal.
pub async fn get_new_goal_page() -> Response {
    let nav_bar = NavBar::new(endpoints::GOALS_VIEW).into_html();
    let fields = goal_form_fields(&GoalFormDefaults::default());

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto max-w-md text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold mb-4" { "New Savings Goal" }

            form
                hx-post=(endpoints::POST_GOAL)
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
                    "Create Goal"
                }
            }
        }
    );

    base("New Savings Goal", &[dollar_input_styles()], &content).into_response()
}
