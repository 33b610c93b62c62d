//! The revenue page handler and its views.

use std::{
    ops::RangeInclusive,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error,
    charts::{ECHARTS_SCRIPT, PageChart, charts_script, charts_view},
    currency::{
        DisplayCurrency, RateTable, get_display_currency, session_rate_table,
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_INPUT_STYLE, HeadElement, base},
    navigation::NavBar,
    timezone::get_local_offset,
};

use super::{
    charts::{monthly_revenue_chart, plan_revenue_chart, provider_revenue_chart},
    models::Transaction,
    query::{
        get_churned_subscriber_count, get_completed_transactions_in_range,
        get_monthly_revenue_summary,
    },
    tables::{mrr_summary_table, revenue_summary_table},
};

/// Number of days to look back for the trailing-year revenue window.
const YEARLY_PERIOD_DAYS: i64 = 365;

/// The state needed for displaying the revenue page.
#[derive(Debug, Clone)]
pub struct RevenueState {
    /// The database connection holding the analytics tables.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Ho_Chi_Minh".
    pub local_timezone: String,
    /// The exchange-rate table cached for the lifetime of the process.
    pub rate_cache: Arc<Mutex<Option<RateTable>>>,
}

impl FromRef<AppState> for RevenueState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            rate_cache: state.rate_cache.clone(),
        }
    }
}

/// Holds all the data needed to render the revenue page.
struct RevenueData {
    charts: [PageChart; 3],
    tables: Vec<Markup>,
    display_currency: DisplayCurrency,
}

/// Display the revenue overview for the trailing year.
pub async fn get_revenue_page(State(state): State<RevenueState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::REVENUE_VIEW);

    match build_revenue_data(&state, &connection)? {
        Some(data) => Ok(revenue_view(nav_bar, &data).into_response()),
        None => Ok(revenue_no_data_view(nav_bar).into_response()),
    }
}

/// Gets the date range for revenue queries (last year from today).
fn get_revenue_date_range(local_timezone: UtcOffset) -> RangeInclusive<Date> {
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();
    let one_year_ago = today - Duration::days(YEARLY_PERIOD_DAYS);
    one_year_ago..=today
}

/// Fetches and builds all data needed for the revenue display.
///
/// The MRR summary and churn count are optional datasets. When their tables
/// are missing or their queries fail, the page still renders with only the
/// transaction-derived charts and a warning in the log.
///
/// # Returns
/// All revenue data ready for rendering, or `None` if no completed
/// transactions exist in the window.
///
/// # Errors
/// Returns an error if the transaction query fails or the timezone is invalid.
fn build_revenue_data(
    state: &RevenueState,
    connection: &Connection,
) -> Result<Option<RevenueData>, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let date_range = get_revenue_date_range(local_timezone);
    let today = *date_range.end();

    let rates = session_rate_table(&state.rate_cache, connection, today)?;
    let display_currency = get_display_currency(connection)
        .inspect_err(|error| tracing::error!("could not get display currency: {error}"))?;

    let transactions = get_completed_transactions_in_range(date_range, connection)
        .inspect_err(|error| {
            tracing::error!("Could not get transactions for last year: {error}")
        })?;

    if transactions.is_empty() {
        return Ok(None);
    }

    let charts = build_revenue_charts(&transactions, &rates, display_currency);

    let mut tables = vec![revenue_summary_table(&transactions, &rates, display_currency)];

    // Optional datasets degrade to an absent table rather than a failed page.
    match get_monthly_revenue_summary(connection) {
        Ok(summaries) if !summaries.is_empty() => {
            let churned = match get_churned_subscriber_count(connection) {
                Ok(count) => Some(count),
                Err(error) => {
                    tracing::warn!("churn count unavailable: {error}");
                    None
                }
            };
            tables.push(mrr_summary_table(
                &summaries,
                churned,
                &rates,
                display_currency,
            ));
        }
        Ok(_) => {}
        Err(error) => tracing::warn!("MRR summary unavailable: {error}"),
    }

    Ok(Some(RevenueData {
        charts,
        tables,
        display_currency,
    }))
}

/// Creates the array of revenue charts from transaction data.
fn build_revenue_charts(
    transactions: &[Transaction],
    rates: &RateTable,
    display_currency: DisplayCurrency,
) -> [PageChart; 3] {
    [
        PageChart {
            id: "monthly-revenue-chart",
            options: monthly_revenue_chart(transactions, rates, display_currency).to_string(),
        },
        PageChart {
            id: "provider-revenue-chart",
            options: provider_revenue_chart(transactions, rates, display_currency).to_string(),
        },
        PageChart {
            id: "plan-revenue-chart",
            options: plan_revenue_chart(transactions, rates, display_currency).to_string(),
        },
    ]
}

/// Renders the display-currency switcher form.
fn currency_switcher(display_currency: DisplayCurrency) -> Markup {
    html!(
        form
            method="post"
            action=(endpoints::DISPLAY_CURRENCY)
            class="flex items-center gap-2 mb-4 self-end"
        {
            label for="currency" class="text-sm" { "Display currency" }

            select
                id="currency"
                name="currency"
                class=(FORM_INPUT_STYLE)
            {
                @for currency in [DisplayCurrency::Usd, DisplayCurrency::Vnd] {
                    option
                        value=(currency.code())
                        selected[currency == display_currency]
                    {
                        (currency.code())
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    )
}

/// Renders the revenue page when no completed transactions exist.
fn revenue_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();

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
                "Charts will show up here once completed transactions land in
                the analytics database."
            }
        }
    );

    base("Revenue", &[], &content)
}

/// Renders the main revenue page with charts and tables.
fn revenue_view(nav_bar: NavBar, data: &RevenueData) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="revenue-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (currency_switcher(data.display_currency))

            (charts_view(&data.charts))

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full"
            {
                @for table in &data.tables {
                    (table)
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&data.charts),
    ];

    base("Revenue", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use scraper::{Html, Selector};
    use std::sync::{Arc, Mutex};
    use time::{Duration, OffsetDateTime};

    use rusqlite::Connection;

    use crate::db::initialize;

    use super::{RevenueState, get_revenue_page};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn make_state(conn: Connection) -> RevenueState {
        RevenueState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
            rate_cache: Arc::new(Mutex::new(None)),
        }
    }

    fn insert_transaction(conn: &Connection, transaction_date: &str, amount: f64, currency: &str) {
        conn.execute(
            "INSERT INTO unified_transactions \
            (transaction_date, amount, currency, payment_provider, subscription_plan, status, \
            user_id, created_at) \
            VALUES (?1, ?2, ?3, 'stripe', 'monthly', 'completed', 'user-1', ?1)",
            rusqlite::params![transaction_date, amount, currency],
        )
        .unwrap();
    }

    #[tokio::test]
    async fn revenue_page_loads_successfully() {
        let conn = get_test_connection();
        let today = OffsetDateTime::now_utc().date();
        insert_transaction(&conn, &today.to_string(), 100.0, "USD");
        insert_transaction(
            &conn,
            &(today - Duration::days(15)).to_string(),
            2_610_000.0,
            "VND",
        );

        let response = get_revenue_page(State(make_state(conn))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert_valid_html(&html);

        assert_chart_exists(&html, "monthly-revenue-chart");
        assert_chart_exists(&html, "provider-revenue-chart");
        assert_chart_exists(&html, "plan-revenue-chart");

        let selector = Selector::parse("table").unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Revenue summary table not found"
        );
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let conn = get_test_connection();

        let response = get_revenue_page(State(make_state(conn))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html(response).await;
        let selector = Selector::parse("#charts").unwrap();
        assert!(html.select(&selector).next().is_none());
    }

    #[tokio::test]
    async fn page_renders_without_mrr_summary_table() {
        let conn = get_test_connection();
        let today = OffsetDateTime::now_utc().date();
        insert_transaction(&conn, &today.to_string(), 100.0, "USD");
        conn.execute("DROP TABLE monthly_revenue_summary", ())
            .unwrap();

        let response = get_revenue_page(State(make_state(conn))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn currency_switcher_is_present() {
        let conn = get_test_connection();
        let today = OffsetDateTime::now_utc().date();
        insert_transaction(&conn, &today.to_string(), 100.0, "USD");

        let response = get_revenue_page(State(make_state(conn))).await.unwrap();
        let html = parse_html(response).await;

        let selector = Selector::parse("select[name='currency'] option").unwrap();
        let options: Vec<_> = html.select(&selector).collect();
        assert_eq!(options.len(), 2);
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{}' not found",
            chart_id
        );
    }
}
