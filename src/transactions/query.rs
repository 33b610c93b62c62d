//! Database queries for the transactions browser.

use rusqlite::{Connection, params_from_iter};

use crate::Error;

use super::{filter::TransactionsQuery, models::TransactionRow};

const SELECT_COLUMNS: &str = "SELECT id, transaction_date, amount, currency, payment_provider, \
    subscription_plan, status, user_id, created_at FROM unified_transactions";

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<TransactionRow> {
    Ok(TransactionRow {
        id: row.get(0)?,
        transaction_date: row.get(1)?,
        amount: row.get(2)?,
        currency: row.get(3)?,
        payment_provider: row.get(4)?,
        subscription_plan: row.get(5)?,
        status: row.get(6)?,
        user_id: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Count the rows matching `filter`.
pub(crate) fn count_transactions(
    filter: &TransactionsQuery,
    connection: &Connection,
) -> Result<u64, Error> {
    let (where_clause, params) = filter.where_clause();
    let sql = format!("SELECT COUNT(*) FROM unified_transactions{where_clause}");

    let count = connection.query_row(&sql, params_from_iter(params), |row| row.get(0))?;

    Ok(count)
}

/// Get one page of rows matching `filter`, newest first.
pub(crate) fn get_transaction_page_rows(
    filter: &TransactionsQuery,
    page: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<Vec<TransactionRow>, Error> {
    let (where_clause, params) = filter.where_clause();
    let offset = page.saturating_sub(1) * page_size;
    let sql = format!(
        "{SELECT_COLUMNS}{where_clause} \
        ORDER BY transaction_date DESC, id ASC LIMIT {page_size} OFFSET {offset}"
    );

    connection
        .prepare(&sql)?
        .query_map(params_from_iter(params), map_row)?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}

/// Get every row matching `filter`, newest first.
///
/// Used by the CSV export and the report endpoint, which both cover the whole
/// filtered set rather than a page of it.
pub(crate) fn get_all_transaction_rows(
    filter: &TransactionsQuery,
    connection: &Connection,
) -> Result<Vec<TransactionRow>, Error> {
    let (where_clause, params) = filter.where_clause();
    let sql = format!("{SELECT_COLUMNS}{where_clause} ORDER BY transaction_date DESC, id ASC");

    connection
        .prepare(&sql)?
        .query_map(params_from_iter(params), map_row)?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::db::initialize;

    use super::{
        super::filter::TransactionsQuery, count_transactions, get_all_transaction_rows,
        get_transaction_page_rows,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert_transaction(conn: &Connection, transaction_date: &str, provider: &str, status: &str) {
        conn.execute(
            "INSERT INTO unified_transactions \
            (transaction_date, amount, currency, payment_provider, subscription_plan, status, \
            user_id, created_at) \
            VALUES (?1, 10.0, 'USD', ?2, 'monthly', ?3, 'user-1', ?1)",
            rusqlite::params![transaction_date, provider, status],
        )
        .unwrap();
    }

    #[test]
    fn date_filter_is_inclusive_on_both_ends() {
        let conn = get_test_connection();
        insert_transaction(&conn, "2025-03-31", "stripe", "completed");
        insert_transaction(&conn, "2025-04-01", "stripe", "completed");
        insert_transaction(&conn, "2025-04-30", "stripe", "completed");
        insert_transaction(&conn, "2025-05-01", "stripe", "completed");

        let filter = TransactionsQuery {
            start_date: Some(date!(2025 - 04 - 01)),
            end_date: Some(date!(2025 - 04 - 30)),
            ..Default::default()
        };

        let rows = get_all_transaction_rows(&filter, &conn).unwrap();
        let dates: Vec<String> = rows
            .iter()
            .map(|row| row.transaction_date.to_string())
            .collect();

        assert_eq!(dates, vec!["2025-04-30", "2025-04-01"]);
        assert_eq!(count_transactions(&filter, &conn).unwrap(), 2);
    }

    #[test]
    fn rows_are_sorted_newest_first() {
        let conn = get_test_connection();
        insert_transaction(&conn, "2025-01-01", "stripe", "completed");
        insert_transaction(&conn, "2025-03-01", "stripe", "completed");
        insert_transaction(&conn, "2025-02-01", "stripe", "completed");

        let rows = get_all_transaction_rows(&TransactionsQuery::default(), &conn).unwrap();

        assert_eq!(rows[0].transaction_date, date!(2025 - 03 - 01));
        assert_eq!(rows[2].transaction_date, date!(2025 - 01 - 01));
    }

    #[test]
    fn same_day_rows_keep_insertion_order() {
        let conn = get_test_connection();
        insert_transaction(&conn, "2025-01-01", "stripe", "completed");
        insert_transaction(&conn, "2025-01-01", "momo", "completed");
        insert_transaction(&conn, "2025-01-01", "paypal", "completed");

        let rows = get_all_transaction_rows(&TransactionsQuery::default(), &conn).unwrap();
        let providers: Vec<&str> = rows.iter().map(|row| row.payment_provider.as_str()).collect();

        assert_eq!(providers, vec!["stripe", "momo", "paypal"]);
    }

    #[test]
    fn equality_filters_narrow_the_result() {
        let conn = get_test_connection();
        insert_transaction(&conn, "2025-01-01", "stripe", "completed");
        insert_transaction(&conn, "2025-01-02", "momo", "completed");
        insert_transaction(&conn, "2025-01-03", "stripe", "refunded");

        let filter = TransactionsQuery {
            provider: Some("stripe".to_owned()),
            status: Some("completed".to_owned()),
            ..Default::default()
        };

        let rows = get_all_transaction_rows(&filter, &conn).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_date, date!(2025 - 01 - 01));
    }

    #[test]
    fn pagination_slices_the_sorted_rows() {
        let conn = get_test_connection();
        for day in 1..=7 {
            insert_transaction(&conn, &format!("2025-01-{day:02}"), "stripe", "completed");
        }

        let filter = TransactionsQuery::default();

        let first_page = get_transaction_page_rows(&filter, 1, 3, &conn).unwrap();
        let third_page = get_transaction_page_rows(&filter, 3, 3, &conn).unwrap();

        assert_eq!(first_page.len(), 3);
        assert_eq!(first_page[0].transaction_date, date!(2025 - 01 - 07));
        assert_eq!(third_page.len(), 1);
        assert_eq!(third_page[0].transaction_date, date!(2025 - 01 - 01));
    }
}
