//! Dispatching transaction reports to the functions backend.
//!
//! The report itself (rendering, emailing) is handled by the
//! `send-transaction-report` function; this endpoint collects the filtered
//! rows and posts them over.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::Response,
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Serialize;

use crate::{AppState, Error, alert::alert_success};

use super::{
    filter::TransactionsQuery, models::TransactionRow, query::get_all_transaction_rows,
};

/// The state needed for dispatching transaction reports.
#[derive(Debug, Clone)]
pub struct TransactionReportState {
    /// The database connection holding the transactions table.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Base URL of the functions backend, if configured.
    pub functions_url: Option<String>,
}

impl FromRef<AppState> for TransactionReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            functions_url: state.functions_url.clone(),
        }
    }
}

/// The JSON body posted to the functions backend.
#[derive(Serialize)]
struct ReportPayload {
    filters: TransactionsQuery,
    row_count: usize,
    transactions: Vec<TransactionRow>,
}

/// API endpoint that posts the filtered transactions to the report function.
pub async fn send_transaction_report(
    State(state): State<TransactionReportState>,
    Form(query): Form<TransactionsQuery>,
) -> Response {
    let Some(functions_url) = &state.functions_url else {
        return Error::FunctionsNotConfigured.into_alert_response();
    };

    let mut filter = query.normalized();
    filter.page = None;

    // Collect everything before the request so the connection guard is not
    // held across an await.
    let payload = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        let transactions = match get_all_transaction_rows(&filter, &connection) {
            Ok(transactions) => transactions,
            Err(error) => {
                tracing::error!("could not get transaction rows: {error}");
                return error.into_alert_response();
            }
        };

        ReportPayload {
            row_count: transactions.len(),
            filters: filter,
            transactions,
        }
    };

    let row_count = payload.row_count;
    let url = format!("{}/send-transaction-report", functions_url.trim_end_matches('/'));

    let response = reqwest::Client::new().post(&url).json(&payload).send().await;

    match response.and_then(reqwest::Response::error_for_status) {
        Ok(_) => alert_success(
            "Report sent",
            &format!("{row_count} transactions included."),
        ),
        Err(error) => {
            tracing::error!("report dispatch to {url} failed: {error}");
            Error::UpstreamError(error.to_string()).into_alert_response()
        }
    }
}
