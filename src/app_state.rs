//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, currency::RateTable, db::initialize, pagination::PaginationConfig};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Ho_Chi_Minh".
    pub local_timezone: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// Base URL of the external functions host (`get-sat-seats`,
    /// `send-transaction-report`). `None` disables the features that need it.
    pub functions_url: Option<String>,

    /// The exchange-rate table, loaded lazily and kept for the lifetime of
    /// the server process.
    pub rate_cache: Arc<Mutex<Option<RateTable>>>,

    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables the
    /// dashboard pages query. `local_timezone` should be a valid, canonical
    /// timezone name, e.g. "Asia/Ho_Chi_Minh".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        pagination_config: PaginationConfig,
        functions_url: Option<String>,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            pagination_config,
            functions_url,
            rate_cache: Arc::new(Mutex::new(None)),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
