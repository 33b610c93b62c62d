//! The transactions listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_INPUT_STYLE, FORM_LABEL_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base,
    },
    navigation::NavBar,
    pagination::{Indicator, PaginationConfig, page_count, page_indicators},
};

use super::{
    filter::TransactionsQuery,
    models::TransactionRow,
    query::{count_transactions, get_transaction_page_rows},
};

/// The state needed for the transactions listing page.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection holding the transactions table.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Pager settings.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Display the filtered, paginated transactions table.
pub async fn get_transactions_page(
    State(state): State<TransactionsState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let filter = query.normalized();
    let page_size = state.pagination_config.default_page_size;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let row_count = count_transactions(&filter, &connection)
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;

    // An out-of-range page lands on the last page instead of an empty table.
    let total_pages = page_count(row_count, page_size);
    let page = filter.page.unwrap_or(1).clamp(1, total_pages);

    let rows = get_transaction_page_rows(&filter, page, page_size, &connection)
        .inspect_err(|error| tracing::error!("could not get transaction rows: {error}"))?;

    let indicators = page_indicators(page, total_pages, state.pagination_config.max_indicators);

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW);

    Ok(transactions_view(nav_bar, &filter, &rows, &indicators).into_response())
}

fn page_url(filter: &TransactionsQuery, page: u64) -> String {
    let filter_query = filter.to_query_string();

    if filter_query.is_empty() {
        format!("{}?page={page}", endpoints::TRANSACTIONS_VIEW)
    } else {
        format!("{}?{filter_query}&page={page}", endpoints::TRANSACTIONS_VIEW)
    }
}

fn export_url(filter: &TransactionsQuery) -> String {
    let filter_query = filter.to_query_string();

    if filter_query.is_empty() {
        endpoints::EXPORT_TRANSACTIONS.to_owned()
    } else {
        format!("{}?{filter_query}", endpoints::EXPORT_TRANSACTIONS)
    }
}

fn filter_form(filter: &TransactionsQuery) -> Markup {
    let text_input = |name: &str, label: &str, value: &Option<String>| {
        html!(
            div
            {
                label for=(name) class=(FORM_LABEL_STYLE) { (label) }
                input
                    type="text"
                    id=(name)
                    name=(name)
                    value=[value.as_deref()]
                    class=(FORM_INPUT_STYLE);
            }
        )
    };

    html!(
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid grid-cols-2 md:grid-cols-6 gap-3 items-end w-full mb-4
                bg-gray-50 dark:bg-gray-800 p-4 rounded-lg"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    id="start_date"
                    name="start_date"
                    value=[filter.start_date.map(|date| date.to_string())]
                    class=(FORM_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    id="end_date"
                    name="end_date"
                    value=[filter.end_date.map(|date| date.to_string())]
                    class=(FORM_INPUT_STYLE);
            }

            (text_input("provider", "Provider", &filter.provider))
            (text_input("plan", "Plan", &filter.plan))
            (text_input("status", "Status", &filter.status))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
        }
    )
}

fn transactions_table(rows: &[TransactionRow]) -> Markup {
    html!(
        div class="overflow-x-auto rounded-lg shadow w-full"
        {
            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Currency" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Provider" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Plan" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "User" }
                    }
                }

                tbody
                {
                    @for row in rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (row.transaction_date) }
                            td class=(TABLE_CELL_STYLE) { (format!("{:.2}", row.amount)) }
                            td class=(TABLE_CELL_STYLE) { (row.currency) }
                            td class=(TABLE_CELL_STYLE) { (row.payment_provider) }
                            td class=(TABLE_CELL_STYLE) {
                                (row.subscription_plan.as_deref().unwrap_or("—"))
                            }
                            td class=(TABLE_CELL_STYLE) { (row.status) }
                            td class=(TABLE_CELL_STYLE) {
                                (row.user_id.as_deref().unwrap_or("—"))
                            }
                        }
                    }
                }
            }
        }
    )
}

fn pager(filter: &TransactionsQuery, indicators: &[Indicator]) -> Markup {
    let link_style = "px-3 py-1 rounded hover:bg-gray-200 dark:hover:bg-gray-700";
    let current_style = "px-3 py-1 rounded bg-blue-500 text-white";

    html!(
        nav class="flex gap-1 mt-4" aria-label="Pages"
        {
            @for indicator in indicators {
                @match indicator {
                    Indicator::Page(page) => {
                        a href=(page_url(filter, *page)) class=(link_style) { (page) }
                    }
                    Indicator::Current(page) => {
                        span class=(current_style) aria-current="page" { (page) }
                    }
                    Indicator::Gap => span class="px-3 py-1" { "…" }
                    Indicator::Prev(page) => {
                        a href=(page_url(filter, *page)) class=(link_style) { "Previous" }
                    }
                    Indicator::Next(page) => {
                        a href=(page_url(filter, *page)) class=(link_style) { "Next" }
                    }
                }
            }
        }
    )
}

fn report_form(filter: &TransactionsQuery) -> Markup {
    html!(
        form
            method="post"
            action=(endpoints::REPORT_TRANSACTIONS)
            class="inline"
        {
            input type="hidden" name="start_date" value=[filter.start_date.map(|d| d.to_string())];
            input type="hidden" name="end_date" value=[filter.end_date.map(|d| d.to_string())];
            input type="hidden" name="provider" value=[filter.provider.as_deref()];
            input type="hidden" name="plan" value=[filter.plan.as_deref()];
            input type="hidden" name="status" value=[filter.status.as_deref()];

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Email Report" }
        }
    )
}

fn transactions_view(
    nav_bar: NavBar,
    filter: &TransactionsQuery,
    rows: &[TransactionRow],
    indicators: &[Indicator],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
            max-w-screen-xl text-gray-900 dark:text-white"
        {
            (filter_form(filter))

            div class="flex gap-2 self-end mb-2"
            {
                a href=(export_url(filter)) class=(BUTTON_PRIMARY_STYLE) { "Export CSV" }
                (report_form(filter))
            }

            @if rows.is_empty() {
                p { "No transactions match the current filter." }
            } @else {
                (transactions_table(rows))
                (pager(filter, indicators))
            }
        }
    );

    base("Transactions", &[], &content)
}
