//! The dashboard page handler and its HTML views.

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
    dashboard::charts::{
        DashboardChart, charts_script, charts_view, expenses_by_category_chart, net_by_month_chart,
    },
    endpoints,
    html::{
        CATEGORY_BADGE_STYLE, HeadElement, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, currency_rounded_with_tooltip, format_currency, link,
    },
    navigation::NavBar,
    report::{
        Entry,
        aggregation::{
            MONTHLY_SERIES_WINDOW, RECENT_COUNT, Totals, monthly_series, recent,
            sorted_category_spending, totals,
        },
        get_entries_for_user,
    },
    transaction::TransactionKind,
    user::UserId,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = get_entries_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if entries.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let summary = totals(&entries);
    let recent_entries = recent(&entries, RECENT_COUNT);
    let series = monthly_series(&entries, MONTHLY_SERIES_WINDOW);
    let categories = sorted_category_spending(&entries);

    let mut charts = vec![DashboardChart {
        id: "net-by-month-chart",
        options: net_by_month_chart(&series).to_string(),
    }];

    if !categories.is_empty() {
        charts.push(DashboardChart {
            id: "expenses-chart",
            options: expenses_by_category_chart(&categories).to_string(),
        });
    }

    Ok(dashboard_view(nav_bar, &summary, recent_entries, &charts).into_response())
}

/// Renders the dashboard page when no transaction data exists.
///
/// Displays a helpful message with a link to add transactions.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Summaries and charts will show up here once you add some transactions.
                Get started by " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with totals, charts and the recent
/// transactions table.
fn dashboard_view(
    nav_bar: NavBar<'_>,
    summary: &Totals,
    recent_entries: &[Entry],
    charts: &[DashboardChart],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (totals_cards(summary))

            (charts_view(charts))

            section class="w-full mx-auto mb-4"
            {
                div class="flex items-center justify-between mb-4"
                {
                    h3 class="text-xl font-semibold" { "Recent Transactions" }

                    (link(endpoints::TRANSACTIONS_VIEW, "View all"))
                }

                (recent_transactions_table(recent_entries))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}

fn totals_cards(summary: &Totals) -> Markup {
    let balance_style = if summary.balance >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html!(
        section class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                div class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Total Income" }

                    p class="text-2xl font-bold text-green-600 dark:text-green-400"
                    {
                        (currency_rounded_with_tooltip(summary.income))
                    }
                }

                div class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Total Expenses" }

                    p class="text-2xl font-bold text-red-600 dark:text-red-400"
                    {
                        (currency_rounded_with_tooltip(summary.expense))
                    }
                }

                div class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Balance" }

                    p class={"text-2xl font-bold " (balance_style)}
                    {
                        (currency_rounded_with_tooltip(summary.balance))
                    }
                }
            }
        }
    )
}

fn recent_transactions_table(entries: &[Entry]) -> Markup {
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
                    }
                }

                tbody
                {
                    @for entry in entries {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (entry.date) }

                            @match entry.kind {
                                TransactionKind::Income => {
                                    td class={(TABLE_CELL_STYLE) " text-green-600 dark:text-green-400"}
                                    {
                                        "+" (format_currency(entry.amount))
                                    }
                                }
                                TransactionKind::Expense => {
                                    td class={(TABLE_CELL_STYLE) " text-red-600 dark:text-red-400"}
                                    {
                                        "−" (format_currency(entry.amount))
                                    }
                                }
                            }

                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (entry.category) }
                            }
                        }
                    }
                }
            }
        }
    )
}
