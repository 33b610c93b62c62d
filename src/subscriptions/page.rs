//! The subscriptions page handler and its views.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    charts::{ECHARTS_SCRIPT, PageChart, charts_script, charts_view},
    endpoints,
    html::{
        HeadElement, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base,
    },
    navigation::NavBar,
};

use super::{
    charts::{churn_chart, cohort_chart},
    cohorts::{Cohort, FunnelStage, churn_by_month, conversion_funnel, plan_mix, signup_cohorts},
    query::get_all_subscribers,
};

/// The state needed for displaying the subscriptions page.
#[derive(Debug, Clone)]
pub struct SubscriptionsState {
    /// The database connection holding the subscriber table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SubscriptionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display cohort, funnel, and churn views of the subscriber base.
pub async fn get_subscriptions_page(
    State(state): State<SubscriptionsState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::SUBSCRIPTIONS_VIEW);

    let subscribers = get_all_subscribers(&connection)
        .inspect_err(|error| tracing::error!("could not get subscribers: {error}"))?;

    if subscribers.is_empty() {
        return Ok(subscriptions_no_data_view(nav_bar).into_response());
    }

    let cohorts = signup_cohorts(&subscribers);
    let funnel = conversion_funnel(&subscribers);
    let churn = churn_by_month(&subscribers);
    let plans = plan_mix(&subscribers);

    let charts = [
        PageChart {
            id: "cohort-chart",
            options: cohort_chart(&cohorts).to_string(),
        },
        PageChart {
            id: "churn-chart",
            options: churn_chart(&churn).to_string(),
        },
    ];

    Ok(subscriptions_view(nav_bar, &charts, &cohorts, &funnel, &plans).into_response())
}

fn funnel_table(funnel: &[FunnelStage]) -> Markup {
    html!(
        div {
            h3 class="text-xl font-semibold mb-4" { "Conversion Funnel" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class=(TABLE_STYLE) {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Stage" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Subscribers" }
                        }
                    }
                    tbody {
                        @for stage in funnel {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (stage.label) }
                                td class=(TABLE_CELL_STYLE) { (stage.count) }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn cohort_table(cohorts: &[Cohort]) -> Markup {
    html!(
        div {
            h3 class="text-xl font-semibold mb-4" { "Cohort Conversion Rates" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class=(TABLE_STYLE) {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Cohort" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Signups" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Conversions" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Rate" }
                        }
                    }
                    tbody {
                        @for cohort in cohorts {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) {
                                    (super::charts::month_label(cohort.month))
                                }
                                td class=(TABLE_CELL_STYLE) { (cohort.signups) }
                                td class=(TABLE_CELL_STYLE) { (cohort.conversions) }
                                td class=(TABLE_CELL_STYLE) {
                                    (format!("{:.1}%", cohort.conversion_rate() * 100.0))
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn plan_mix_table(plans: &[(String, u64)]) -> Markup {
    let total: u64 = plans.iter().map(|(_, count)| count).sum();

    html!(
        div {
            h3 class="text-xl font-semibold mb-4" { "Plan Mix" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class=(TABLE_STYLE) {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Plan" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Subscribers" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Share" }
                        }
                    }
                    tbody {
                        @for (plan, count) in plans {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (plan) }
                                td class=(TABLE_CELL_STYLE) { (count) }
                                td class=(TABLE_CELL_STYLE) {
                                    (format!("{:.1}%", *count as f64 / total as f64 * 100.0))
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn subscriptions_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p { "Cohorts will show up here once subscriber rows land in the analytics database." }
        }
    );

    base("Subscriptions", &[], &content)
}

fn subscriptions_view(
    nav_bar: NavBar,
    charts: &[PageChart],
    cohorts: &[Cohort],
    funnel: &[FunnelStage],
    plans: &[(String, u64)],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
            max-w-screen-xl text-gray-900 dark:text-white"
        {
            (charts_view(charts))

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full"
            {
                (funnel_table(funnel))
                (cohort_table(cohorts))
                (plan_mix_table(plans))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(charts),
    ];

    base("Subscriptions", &scripts, &content)
}
