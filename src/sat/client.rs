//! HTTP client for the `get-sat-seats` function.

use serde::Deserialize;

use crate::Error;

/// One seat-availability record as returned by the functions backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(super) struct SeatRecord {
    /// The test center's name.
    pub(super) center: String,
    /// The city the center is in, as the upstream spells it.
    pub(super) city: String,
    /// The test sitting the seats are for.
    pub(super) test_date: String,
    /// How many seats are open.
    pub(super) seats_available: i64,
}

/// Fetch the current seat availability from the functions backend.
///
/// # Errors
/// Returns [Error::UpstreamError] when the backend is unreachable, responds
/// with an error status, or returns a body that does not parse.
pub(super) async fn fetch_sat_seats(functions_url: &str) -> Result<Vec<SeatRecord>, Error> {
    let url = format!("{}/get-sat-seats", functions_url.trim_end_matches('/'));

    let response = reqwest::get(&url)
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|error| Error::UpstreamError(error.to_string()))?;

    response
        .json()
        .await
        .map_err(|error| Error::UpstreamError(error.to_string()))
}
