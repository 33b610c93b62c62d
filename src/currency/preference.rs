//! Persistence and the update endpoint for the display-currency preference.
//!
//! The preference is a single row in the dashboard_preference table, so the
//! chosen currency survives restarts and applies to every browser.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, endpoints};

const DISPLAY_CURRENCY_KEY: &str = "display_currency";

/// The currency amounts are shown in across the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayCurrency {
    /// United States dollar, the reporting baseline.
    #[default]
    Usd,
    /// Vietnamese dong.
    Vnd,
}

impl DisplayCurrency {
    /// The ISO 4217 code for this currency.
    pub fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Vnd => "VND",
        }
    }

    /// Parse a currency code, accepting only the supported display currencies.
    pub fn parse(code: &str) -> Result<Self, Error> {
        match code {
            "USD" => Ok(Self::Usd),
            "VND" => Ok(Self::Vnd),
            other => Err(Error::InvalidDisplayCurrency(other.to_owned())),
        }
    }
}

/// Get the saved display currency, defaulting to USD.
///
/// An unknown stored value is treated as unset rather than an error so a
/// corrupt preference row cannot take down every page.
pub fn get_display_currency(connection: &Connection) -> Result<DisplayCurrency, Error> {
    let stored: Option<String> = connection
        .query_row(
            "SELECT value FROM dashboard_preference WHERE key = ?1",
            [DISPLAY_CURRENCY_KEY],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            error => Err(error),
        })?;

    match stored.as_deref() {
        None => Ok(DisplayCurrency::default()),
        Some(code) => match DisplayCurrency::parse(code) {
            Ok(currency) => Ok(currency),
            Err(_) => {
                tracing::warn!("ignoring unknown stored display currency {code:?}");
                Ok(DisplayCurrency::default())
            }
        },
    }
}

/// Save the display currency, replacing any previous choice.
pub fn save_display_currency(
    currency: DisplayCurrency,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO dashboard_preference (key, value) VALUES (?1, ?2) \
        ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [DISPLAY_CURRENCY_KEY, currency.code()],
    )?;

    Ok(())
}

/// The state needed for updating the display-currency preference.
#[derive(Debug, Clone)]
pub struct CurrencyPreferenceState {
    /// The database connection holding the preference table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CurrencyPreferenceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Form data for updating the display currency.
#[derive(Deserialize)]
pub struct DisplayCurrencyForm {
    /// The requested currency code (`USD` or `VND`).
    pub currency: String,
}

/// API endpoint to update the display currency and return to the dashboard.
pub async fn set_display_currency(
    State(state): State<CurrencyPreferenceState>,
    Form(form): Form<DisplayCurrencyForm>,
) -> Response {
    let currency = match DisplayCurrency::parse(&form.currency) {
        Ok(currency) => currency,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = save_display_currency(currency, &connection) {
        tracing::error!("failed to save display currency: {error}");
        return Error::PreferenceSaveError.into_alert_response();
    }

    Redirect::to(endpoints::REVENUE_VIEW).into_response()
}
