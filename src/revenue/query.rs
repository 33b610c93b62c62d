//! Database query helpers for the revenue dashboard.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use time::Date;

use crate::Error;

use super::models::{MonthlyRevenueSummary, Transaction};

/// Get completed transactions whose date falls inside the inclusive range.
///
/// Refunded, pending, and failed rows never reach the aggregation pipeline.
///
/// # Errors
/// Returns [Error::SqlError] if the query or row mapping fails.
pub(crate) fn get_completed_transactions_in_range(
    date_range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT transaction_date, amount, currency, payment_provider, subscription_plan \
            FROM unified_transactions \
            WHERE status = 'completed' AND transaction_date BETWEEN ?1 AND ?2 \
            ORDER BY transaction_date ASC, id ASC",
        )?
        .query_map(
            [
                date_range.start().to_string(),
                date_range.end().to_string(),
            ],
            |row| {
                Ok(Transaction {
                    date: row.get(0)?,
                    amount: row.get(1)?,
                    currency: row.get(2)?,
                    payment_provider: row.get(3)?,
                    subscription_plan: row.get(4)?,
                })
            },
        )?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}

/// Get the precomputed monthly revenue summary, newest month first.
pub(crate) fn get_monthly_revenue_summary(
    connection: &Connection,
) -> Result<Vec<MonthlyRevenueSummary>, Error> {
    connection
        .prepare(
            "SELECT month, mrr_usd, active_subscriptions FROM monthly_revenue_summary \
            ORDER BY month DESC LIMIT 12",
        )?
        .query_map([], |row| {
            Ok(MonthlyRevenueSummary {
                month: row.get(0)?,
                mrr_usd: row.get(1)?,
                active_subscriptions: row.get(2)?,
            })
        })?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}

/// Count subscribers whose subscription has lapsed.
pub(crate) fn get_churned_subscriber_count(connection: &Connection) -> Result<i64, Error> {
    let count = connection.query_row(
        "SELECT COUNT(*) FROM subscriber WHERE status = 'churned'",
        [],
        |row| row.get(0),
    )?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::db::initialize;

    use super::get_completed_transactions_in_range;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert_transaction(conn: &Connection, transaction_date: &str, amount: f64, status: &str) {
        conn.execute(
            "INSERT INTO unified_transactions \
            (transaction_date, amount, currency, payment_provider, subscription_plan, status, \
            user_id, created_at) \
            VALUES (?1, ?2, 'USD', 'stripe', 'monthly', ?3, 'user-1', ?1)",
            rusqlite::params![transaction_date, amount, status],
        )
        .unwrap();
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let conn = get_test_connection();
        insert_transaction(&conn, "2025-03-31", 1.0, "completed");
        insert_transaction(&conn, "2025-04-01", 2.0, "completed");
        insert_transaction(&conn, "2025-04-30", 3.0, "completed");
        insert_transaction(&conn, "2025-05-01", 4.0, "completed");

        let got = get_completed_transactions_in_range(
            date!(2025 - 04 - 01)..=date!(2025 - 04 - 30),
            &conn,
        )
        .unwrap();

        let amounts: Vec<f64> = got.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![2.0, 3.0]);
    }

    #[test]
    fn only_completed_transactions_are_returned() {
        let conn = get_test_connection();
        insert_transaction(&conn, "2025-04-10", 10.0, "completed");
        insert_transaction(&conn, "2025-04-11", 20.0, "refunded");
        insert_transaction(&conn, "2025-04-12", 30.0, "pending");

        let got = get_completed_transactions_in_range(
            date!(2025 - 04 - 01)..=date!(2025 - 04 - 30),
            &conn,
        )
        .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].amount, 10.0);
    }
}
