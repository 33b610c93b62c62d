//! CSV download of the filtered transaction set.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::Error;

use super::{
    filter::TransactionsQuery, models::TransactionRow, page::TransactionsState,
    query::get_all_transaction_rows,
};

/// The column order of the exported file. Fixed so downstream spreadsheets
/// keep working across releases.
const CSV_HEADER: [&str; 8] = [
    "transaction_date",
    "amount",
    "currency",
    "payment_provider",
    "subscription_plan",
    "status",
    "user_id",
    "created_at",
];

/// Download the filtered transactions as a CSV attachment.
///
/// The export covers every matching row, not just the page being viewed.
pub async fn export_transactions_csv(
    State(state): State<TransactionsState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let filter = query.normalized();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rows = get_all_transaction_rows(&filter, &connection)
        .inspect_err(|error| tracing::error!("could not get transaction rows: {error}"))?;

    let body = write_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

fn write_csv(rows: &[TransactionRow]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.transaction_date.to_string(),
                row.amount.to_string(),
                row.currency.clone(),
                row.payment_provider.clone(),
                row.subscription_plan.clone().unwrap_or_default(),
                row.status.clone(),
                row.user_id.clone().unwrap_or_default(),
                row.created_at.clone(),
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Query, State},
        http::header,
    };
    use rusqlite::Connection;
    use std::sync::{Arc, Mutex};

    use crate::{db::initialize, pagination::PaginationConfig};

    use super::{
        super::{filter::TransactionsQuery, page::TransactionsState},
        CSV_HEADER, export_transactions_csv,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn make_state(conn: Connection) -> TransactionsState {
        TransactionsState {
            db_connection: Arc::new(Mutex::new(conn)),
            pagination_config: PaginationConfig::default(),
        }
    }

    fn insert_transaction(conn: &Connection, transaction_date: &str, provider: &str) {
        conn.execute(
            "INSERT INTO unified_transactions \
            (transaction_date, amount, currency, payment_provider, subscription_plan, status, \
            user_id, created_at) \
            VALUES (?1, 10.0, 'USD', ?2, 'monthly', 'completed', 'user-1', ?1)",
            rusqlite::params![transaction_date, provider],
        )
        .unwrap();
    }

    async fn response_text(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn export_contains_one_row_per_filtered_transaction() {
        let conn = get_test_connection();
        insert_transaction(&conn, "2025-01-01", "stripe");
        insert_transaction(&conn, "2025-02-01", "momo");
        insert_transaction(&conn, "2025-03-01", "stripe");

        let response = export_transactions_csv(
            State(make_state(conn)),
            Query(TransactionsQuery {
                provider: Some("stripe".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        assert!(disposition.contains("transactions.csv"));

        let text = response_text(response).await;
        let mut reader = csv::Reader::from_reader(text.as_bytes());

        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(CSV_HEADER.to_vec())
        );
        assert_eq!(reader.records().count(), 2);
    }

    #[tokio::test]
    async fn fields_containing_commas_are_quoted() {
        let conn = get_test_connection();
        insert_transaction(&conn, "2025-01-01", "Acme, Inc.");

        let response = export_transactions_csv(
            State(make_state(conn)),
            Query(TransactionsQuery::default()),
        )
        .await
        .unwrap();

        let text = response_text(response).await;
        assert!(text.contains("\"Acme, Inc.\""), "got: {text}");

        // The quoted field must survive a parse round trip.
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[3], "Acme, Inc.");
    }
}
