//! The page with the form for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    timezone::get_local_offset,
};

/// The value of the category option that reveals the new-category text input.
pub(super) const NEW_CATEGORY_OPTION: &str = "new";

/// The state needed to display the new-transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The database connection for reading categories.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the form for recording a new transaction.
pub async fn get_create_transaction_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    let local_timezone = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form = new_transaction_form(&categories, today);

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto max-w-md text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold mb-4" { "New Transaction" }

            (form)
        }
    );

    Ok(base("New Transaction", &[dollar_input_styles()], &content).into_response())
}

fn new_transaction_form(categories: &[Category], today: time::Date) -> Markup {
    html! {
        form
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="space-y-4 w-full"
        {
            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Transaction type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    div class="flex items-center gap-3"
                    {
                        input
                            name="kind"
                            id="transaction-kind-expense"
                            type="radio"
                            value="expense"
                            checked
                            required
                            tabindex="0"
                            class=(FORM_RADIO_INPUT_STYLE);

                        label
                            for="transaction-kind-expense"
                            class=(FORM_RADIO_LABEL_STYLE)
                        {
                            "Expense"
                        }
                    }

                    div class="flex items-center gap-3"
                    {
                        input
                            name="kind"
                            id="transaction-kind-income"
                            type="radio"
                            value="income"
                            required
                            tabindex="0"
                            class=(FORM_RADIO_INPUT_STYLE);

                        label
                            for="transaction-kind-income"
                            class=(FORM_RADIO_LABEL_STYLE)
                        {
                            "Income"
                        }
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.01"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    max=(today)
                    value=(today)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    name="category"
                    id="category"
                    class=(FORM_TEXT_INPUT_STYLE)
                    onchange="document.getElementById('new-category-wrapper').hidden = this.value !== 'new';"
                {
                    option value="" { "Uncategorized" }

                    @for category in categories {
                        option value=(category.id) { (category.name) }
                    }

                    option value=(NEW_CATEGORY_OPTION) { "New category…" }
                }
            }

            div id="new-category-wrapper" hidden
            {
                label for="new_category" class=(FORM_LABEL_STYLE) { "New category name" }

                input
                    name="new_category"
                    id="new_category"
                    type="text"
                    placeholder="e.g. Subscriptions"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="note" class=(FORM_LABEL_STYLE) { "Note" }

                input
                    name="note"
                    id="note"
                    type="text"
                    placeholder="Optional note"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Add Transaction"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{assert_hx_endpoint, assert_valid_html, must_get_form, parse_html_document},
    };

    use super::{NewTransactionPageState, get_create_transaction_page};

    fn get_test_state() -> NewTransactionPageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        NewTransactionPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn page_displays_form_with_seeded_categories() {
        let response = get_create_transaction_page(State(get_test_state()))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");

        let option_selector = Selector::parse("select[name=category] option").unwrap();
        let options = form.select(&option_selector).collect::<Vec<_>>();
        // Uncategorized + 6 seeded categories + "New category…".
        assert_eq!(options.len(), 8, "want 8 options, got {}", options.len());
    }

    #[tokio::test]
    async fn page_has_kind_radios() {
        let response = get_create_transaction_page(State(get_test_state()))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let form = must_get_form(&document);

        let radio_selector = Selector::parse("input[type=radio][name=kind]").unwrap();
        let radios = form.select(&radio_selector).collect::<Vec<_>>();
        assert_eq!(radios.len(), 2, "want 2 kind radios, got {}", radios.len());

        let values: Vec<_> = radios
            .iter()
            .filter_map(|radio| radio.value().attr("value"))
            .collect();
        assert_eq!(values, vec!["expense", "income"]);
    }
}
