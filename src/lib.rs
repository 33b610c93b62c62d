//! Pulseboard is a self-hosted dashboard for tracking business analytics:
//! revenue, subscriptions, social-media metrics, and SAT test-center
//! availability.
//!
//! This library provides a web server that reads rows from a SQLite store,
//! reshapes them in memory (grouping, aggregation, currency conversion,
//! filtering), and serves HTML pages with charts and tables.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod charts;
mod currency;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod pagination;
mod revenue;
mod routing;
mod sat;
mod social;
mod subscriptions;
mod timezone;
mod transactions;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::{
    alert::alert_error,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical
    /// timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while saving the display-currency preference.
    #[error("failed to save the display currency preference")]
    PreferenceSaveError,

    /// The client submitted a display currency other than USD or VND.
    #[error("\"{0}\" is not a supported display currency")]
    InvalidDisplayCurrency(String),

    /// An operation needed the external functions endpoint but the server
    /// was started without one.
    #[error("no functions URL was configured")]
    FunctionsNotConfigured,

    /// A call to an external function endpoint failed.
    ///
    /// The string should only be logged on the server; clients get a generic
    /// message.
    #[error("external function call failed: {0}")]
    UpstreamError(String),

    /// An error occurred while writing CSV output.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPage {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings \
                        and ensure the timezone has been set to a valid, canonical timezone string."
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::PreferenceSaveError => alert_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Save Failed",
                "Failed to save your display currency. Please try again.",
            ),
            Error::InvalidDisplayCurrency(code) => alert_error(
                StatusCode::BAD_REQUEST,
                "Unsupported Currency",
                &format!("\"{code}\" is not a supported display currency. Choose USD or VND."),
            ),
            Error::FunctionsNotConfigured => alert_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "Reporting Unavailable",
                "The server was started without a functions URL, so reports cannot be sent.",
            ),
            Error::UpstreamError(detail) => {
                tracing::error!("external function call failed: {detail}");
                alert_error(
                    StatusCode::BAD_GATEWAY,
                    "Report Not Sent",
                    "The report service could not be reached. Try again later.",
                )
            }
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                alert_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
            }
        }
    }
}
