//! The insights page: savings rate, rule-based tips, suggested savings goals
//! and saving challenges.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints,
    html::{
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
        format_currency_rounded, link,
    },
    navigation::NavBar,
    report::{
        advice::{Challenge, GoalTemplate, Tip, TipSeverity, challenges, goal_templates, tips},
        aggregation::{
            estimated_monthly_income, month_over_month_expense_delta, savings_rate,
            sorted_category_spending, totals,
        },
        get_entries_for_user,
    },
    timezone::get_local_offset,
    user::{UserId, get_user_by_id},
};

/// The state needed for displaying the insights page.
#[derive(Debug, Clone)]
pub struct InsightsState {
    /// The database connection for reading transactions and the profile.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for InsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display savings tips and goal suggestions derived from the user's
/// transactions and profile.
pub async fn get_insights_page(
    State(state): State<InsightsState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user: {error}"))?;

    let entries = get_entries_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let local_timezone = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    let summary = totals(&entries);
    let monthly_income = estimated_monthly_income(&entries, user.monthly_income);
    let rate = savings_rate(monthly_income, summary.expense);
    let categories = sorted_category_spending(&entries);
    let expense_delta = month_over_month_expense_delta(&entries, today);

    let advice = tips(rate, &categories, &expense_delta);
    let templates = goal_templates(monthly_income);
    let challenge_list = challenges();

    let nav_bar = NavBar::new(endpoints::INSIGHTS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col px-2 lg:px-6 py-8 mx-auto max-w-screen-lg text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold mb-4" { "Insights" }

            (stats_cards(rate, monthly_income, summary.expense))

            section class="mb-8"
            {
                h3 class="text-lg font-semibold mb-4" { "Tips" }

                div class="flex flex-col gap-3"
                {
                    @for tip in &advice {
                        (tip_card(tip))
                    }
                }
            }

            @if !categories.is_empty() {
                section class="mb-8"
                {
                    h3 class="text-lg font-semibold mb-4" { "Spending by Category" }

                    (category_table(&categories))
                }
            }

            section class="mb-8"
            {
                h3 class="text-lg font-semibold mb-4" { "Suggested Savings Goals" }

                p class="text-sm text-gray-600 dark:text-gray-400 mb-3"
                {
                    "Based on your monthly income. Create one on the "
                    (link(endpoints::GOALS_VIEW, "goals page"))
                    " to start tracking progress."
                }

                div class="grid grid-cols-1 md:grid-cols-3 gap-4"
                {
                    @for template in &templates {
                        (goal_template_card(template))
                    }
                }
            }

            section class="mb-8"
            {
                h3 class="text-lg font-semibold mb-4" { "Saving Challenges" }

                div class="grid grid-cols-1 md:grid-cols-3 gap-4"
                {
                    @for challenge in &challenge_list {
                        (challenge_card(challenge))
                    }
                }
            }
        }
    );

    Ok(base("Insights", &[], &content).into_response())
}

fn stats_cards(rate: f64, monthly_income: f64, total_expense: f64) -> Markup {
    let rate_style = if rate >= 20.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html!(
        section class="mb-8"
        {
            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                div class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Savings Rate" }

                    p class={"text-2xl font-bold " (rate_style)}
                    {
                        (format!("{rate:.1}%"))
                    }
                }

                div class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Monthly Income Estimate" }

                    p class="text-2xl font-bold" { (format_currency_rounded(monthly_income)) }
                }

                div class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Total Expenses" }

                    p class="text-2xl font-bold text-red-600 dark:text-red-400"
                    {
                        (format_currency_rounded(total_expense))
                    }
                }
            }
        }
    )
}

fn tip_card(tip: &Tip) -> Markup {
    let (container_style, label) = match tip.severity {
        TipSeverity::Success => (
            "p-4 rounded-lg border-l-4 border-green-500 bg-green-50 dark:bg-gray-800",
            "Success",
        ),
        TipSeverity::Info => (
            "p-4 rounded-lg border-l-4 border-blue-500 bg-blue-50 dark:bg-gray-800",
            "Info",
        ),
        TipSeverity::Warning => (
            "p-4 rounded-lg border-l-4 border-yellow-500 bg-yellow-50 dark:bg-gray-800",
            "Warning",
        ),
    };

    html!(
        div class=(container_style)
        {
            div class="flex items-center gap-2 mb-1"
            {
                span class="text-xs font-semibold uppercase text-gray-500 dark:text-gray-400"
                {
                    (label)
                }

                h4 class="font-semibold" { (tip.title) }
            }

            p class="text-sm text-gray-700 dark:text-gray-300" { (tip.description) }
        }
    )
}

fn category_table(categories: &[(String, f64)]) -> Markup {
    html!(
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Spent" }
                    }
                }

                tbody
                {
                    @for (category, amount) in categories {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (category) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(*amount)) }
                        }
                    }
                }
            }
        }
    )
}

fn goal_template_card(template: &GoalTemplate) -> Markup {
    html!(
        div class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            div class="flex items-center justify-between mb-2"
            {
                h4 class="font-semibold" { (template.title) }

                span class="text-xs font-semibold uppercase text-gray-500 dark:text-gray-400"
                {
                    (template.priority) " priority"
                }
            }

            p class="text-2xl font-bold mb-2" { (format_currency_rounded(template.target)) }

            p class="text-sm text-gray-600 dark:text-gray-400" { (template.description) }
        }
    )
}

fn challenge_card(challenge: &Challenge) -> Markup {
    html!(
        div class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            div class="flex items-center justify-between mb-2"
            {
                h4 class="font-semibold" { (challenge.title) }

                span class="text-xs font-semibold uppercase text-gray-500 dark:text-gray-400"
                {
                    (challenge.difficulty)
                }
            }

            p class="text-sm text-gray-600 dark:text-gray-400" { (challenge.description) }
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
        test_utils::{assert_valid_html, insert_test_user, parse_html_document},
        transaction::{Transaction, TransactionKind, create_transaction},
        user::{ProfileUpdate, update_profile},
    };

    use super::{InsightsState, get_insights_page};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn heading_texts(document: &scraper::Html) -> Vec<String> {
        let selector = Selector::parse("h4").unwrap();
        document
            .select(&selector)
            .map(|heading| heading.text().collect::<String>())
            .collect()
    }

    #[tokio::test]
    async fn shows_low_savings_warning_for_overspending_user() {
        let conn = get_test_connection();
        let user = insert_test_user(&conn);

        // Profile income of 1000 with 900 in expenses: a 10% savings rate.
        update_profile(
            user.id,
            &ProfileUpdate {
                name: "Test".to_owned(),
                email: user.email.clone(),
                monthly_income: 1000.0,
                target_savings: 0.0,
                bio: String::new(),
            },
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(900.0, TransactionKind::Expense, date!(2024 - 01 - 10)),
            user.id,
            &conn,
        )
        .unwrap();

        let state = InsightsState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_insights_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let headings = heading_texts(&document);
        assert!(
            headings.contains(&"Increase Your Savings".to_owned()),
            "expected low-savings tip, got headings {headings:?}"
        );
        assert!(
            headings.contains(&"High Uncategorized Spending".to_owned()),
            "expected highest-category tip, got headings {headings:?}"
        );
    }

    #[tokio::test]
    async fn shows_success_tip_for_good_saver() {
        let conn = get_test_connection();
        let user = insert_test_user(&conn);

        update_profile(
            user.id,
            &ProfileUpdate {
                name: "Test".to_owned(),
                email: user.email.clone(),
                monthly_income: 1000.0,
                target_savings: 0.0,
                bio: String::new(),
            },
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(100.0, TransactionKind::Expense, date!(2024 - 01 - 10)),
            user.id,
            &conn,
        )
        .unwrap();

        let state = InsightsState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_insights_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let headings = heading_texts(&document);
        assert!(
            headings.contains(&"Great Saving Habits!".to_owned()),
            "expected success tip, got headings {headings:?}"
        );
    }

    #[tokio::test]
    async fn shows_goal_templates_and_challenges() {
        let conn = get_test_connection();
        let user = insert_test_user(&conn);

        let state = InsightsState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_insights_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let headings = heading_texts(&document);

        for want in [
            "Emergency Fund",
            "Retirement Fund",
            "Short-term Savings",
            "52-Week Challenge",
            "No-Spend Days",
            "1% Improvement",
        ] {
            assert!(
                headings.contains(&want.to_owned()),
                "expected heading {want:?}, got {headings:?}"
            );
        }
    }
}
