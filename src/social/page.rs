//! The social page handler and its views.

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
    endpoints,
    html::{
        HeadElement, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base,
    },
    navigation::NavBar,
    timezone::get_local_offset,
};

use super::{
    charts::{discord_chart, followers_chart, reach_chart},
    models::{DemographicRow, Post},
    query::{
        get_account_metrics, get_discord_summaries, get_latest_demographics, get_top_posts,
    },
};

/// How many posts the top-posts table shows.
const TOP_POST_COUNT: u64 = 10;

/// Number of days of Discord activity the page looks back over.
const TRAILING_PERIOD_DAYS: i64 = 365;

/// The state needed for displaying the social page.
#[derive(Debug, Clone)]
pub struct SocialState {
    /// The database connection holding the social metric tables.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Ho_Chi_Minh".
    pub local_timezone: String,
}

impl FromRef<AppState> for SocialState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Gets the date range for the Discord summary (last year from today).
fn get_discord_date_range(local_timezone: UtcOffset) -> RangeInclusive<Date> {
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();
    let one_year_ago = today - Duration::days(TRAILING_PERIOD_DAYS);
    one_year_ago..=today
}

/// Display Discord activity, follower growth, top posts, and demographics.
pub async fn get_social_page(State(state): State<SocialState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::SOCIAL_VIEW);

    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let discord = get_discord_summaries(get_discord_date_range(local_timezone), &connection)
        .inspect_err(|error| tracing::error!("could not get Discord summaries: {error}"))?;
    let metrics = get_account_metrics(&connection)
        .inspect_err(|error| tracing::error!("could not get account metrics: {error}"))?;
    let posts = get_top_posts(&connection, TOP_POST_COUNT)
        .inspect_err(|error| tracing::error!("could not get top posts: {error}"))?;
    let demographics = get_latest_demographics(&connection)
        .inspect_err(|error| tracing::error!("could not get demographics: {error}"))?;

    if discord.is_empty() && metrics.is_empty() && posts.is_empty() && demographics.is_empty() {
        return Ok(social_no_data_view(nav_bar).into_response());
    }

    let mut charts = Vec::new();
    if !discord.is_empty() {
        charts.push(PageChart {
            id: "discord-chart",
            options: discord_chart(&discord).to_string(),
        });
    }
    if !metrics.is_empty() {
        charts.push(PageChart {
            id: "followers-chart",
            options: followers_chart(&metrics).to_string(),
        });
        charts.push(PageChart {
            id: "reach-chart",
            options: reach_chart(&metrics).to_string(),
        });
    }

    Ok(social_view(nav_bar, &charts, &posts, &demographics).into_response())
}

fn top_posts_table(posts: &[Post]) -> Markup {
    if posts.is_empty() {
        return html! {};
    }

    html!(
        div {
            h3 class="text-xl font-semibold mb-4" { "Top Posts" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class=(TABLE_STYLE) {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Platform" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Posted" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Likes" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Comments" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Shares" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Engagement" }
                        }
                    }
                    tbody {
                        @for post in posts {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (post.title) }
                                td class=(TABLE_CELL_STYLE) { (post.platform) }
                                td class=(TABLE_CELL_STYLE) { (post.posted_at) }
                                td class=(TABLE_CELL_STYLE) { (post.likes) }
                                td class=(TABLE_CELL_STYLE) { (post.comments) }
                                td class=(TABLE_CELL_STYLE) { (post.shares) }
                                td class={(TABLE_CELL_STYLE) " font-bold"} {
                                    (post.engagement())
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn demographics_table(demographics: &[DemographicRow]) -> Markup {
    if demographics.is_empty() {
        return html! {};
    }

    html!(
        div {
            h3 class="text-xl font-semibold mb-4" { "Audience Demographics" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class=(TABLE_STYLE) {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Platform" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Segment" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Share" }
                        }
                    }
                    tbody {
                        @for row in demographics {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (row.platform) }
                                td class=(TABLE_CELL_STYLE) { (row.segment) }
                                td class=(TABLE_CELL_STYLE) {
                                    (format!("{:.1}%", row.percentage))
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn social_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p { "Charts will show up here once social metrics land in the analytics database." }
        }
    );

    base("Social", &[], &content)
}

fn social_view(
    nav_bar: NavBar,
    charts: &[PageChart],
    posts: &[Post],
    demographics: &[DemographicRow],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
            max-w-screen-xl text-gray-900 dark:text-white"
        {
            @if !charts.is_empty() {
                (charts_view(charts))
            }

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full"
            {
                (top_posts_table(posts))
                (demographics_table(demographics))
            }
        }
    );

    let scripts = if charts.is_empty() {
        vec![]
    } else {
        vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
            charts_script(charts),
        ]
    };

    base("Social", &scripts, &content)
}
