//! The SAT test-center page handler and its views.

use std::collections::BTreeMap;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error, endpoints,
    html::{
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base,
    },
    navigation::NavBar,
};

use super::{
    client::{SeatRecord, fetch_sat_seats},
    normalize::canonical_city,
};

/// The state needed for displaying the SAT test-center page.
#[derive(Debug, Clone)]
pub struct SatState {
    /// Base URL of the functions backend, if configured.
    pub functions_url: Option<String>,
}

impl FromRef<AppState> for SatState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            functions_url: state.functions_url.clone(),
        }
    }
}

/// Display seat availability grouped by city.
///
/// A fetch failure renders the page with an error banner instead of failing
/// the request; the rest of the dashboard stays reachable.
pub async fn get_sat_page(State(state): State<SatState>) -> Response {
    let nav_bar = NavBar::new(endpoints::SAT_VIEW);

    let Some(functions_url) = &state.functions_url else {
        return sat_error_view(
            nav_bar,
            "The server was started without a functions URL, so seat \
            availability cannot be fetched.",
        )
        .into_response();
    };

    match fetch_sat_seats(functions_url).await {
        Ok(records) => sat_view(nav_bar, &group_by_city(records)).into_response(),
        Err(Error::UpstreamError(detail)) => {
            tracing::error!("could not fetch SAT seats: {detail}");
            sat_error_view(
                nav_bar,
                "Seat availability could not be fetched. Try again later.",
            )
            .into_response()
        }
        Err(error) => {
            tracing::error!("could not fetch SAT seats: {error}");
            error.into_response()
        }
    }
}

/// Group records under their canonical city, cities in alphabetical order.
fn group_by_city(records: Vec<SeatRecord>) -> BTreeMap<String, Vec<SeatRecord>> {
    let mut by_city: BTreeMap<String, Vec<SeatRecord>> = BTreeMap::new();

    for record in records {
        by_city
            .entry(canonical_city(&record.city))
            .or_default()
            .push(record);
    }

    by_city
}

fn city_table(city: &str, records: &[SeatRecord]) -> Markup {
    let total_seats: i64 = records.iter().map(|r| r.seats_available).sum();

    html!(
        div class="w-full" {
            h3 class="text-xl font-semibold mb-4" {
                (city) " — " (total_seats) " seats"
            }

            div class="overflow-x-auto rounded-lg shadow mb-6" {
                table class=(TABLE_STYLE) {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Center" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Test Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Seats" }
                        }
                    }
                    tbody {
                        @for record in records {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (record.center) }
                                td class=(TABLE_CELL_STYLE) { (record.test_date) }
                                td class=(TABLE_CELL_STYLE) { (record.seats_available) }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn sat_error_view(nav_bar: NavBar, message: &str) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            div
                role="alert"
                class="p-4 mb-4 rounded-lg bg-red-50 text-red-800 \
                    dark:bg-gray-800 dark:text-red-400 w-full max-w-screen-md"
            {
                p class="font-semibold" { "Seat data unavailable" }
                p class="text-sm" { (message) }
            }
        }
    );

    base("SAT Centers", &[], &content)
}

fn sat_view(nav_bar: NavBar, by_city: &BTreeMap<String, Vec<SeatRecord>>) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
            max-w-screen-xl text-gray-900 dark:text-white"
        {
            @if by_city.is_empty() {
                p { "No upcoming sittings have open seats." }
            } @else {
                @for (city, records) in by_city {
                    (city_table(city, records))
                }
            }
        }
    );

    base("SAT Centers", &[], &content)
}
