//! Database initialization for the analytics store.
//!
//! Pulseboard treats the store as read-mostly: metric rows are loaded by an
//! external ingest job, and the server only writes the dashboard preference
//! table. `initialize` creates every table the pages query so that a fresh
//! database serves empty pages instead of SQL errors.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::Error;

/// Create the application tables if they do not already exist.
///
/// All tables are created inside a single exclusive transaction so a partially
/// initialized schema is never left behind.
///
/// # Errors
/// Returns [Error::SqlError] if the schema cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS unified_transactions (
            id INTEGER PRIMARY KEY,
            transaction_date TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0.0),
            currency TEXT NOT NULL,
            payment_provider TEXT NOT NULL,
            subscription_plan TEXT,
            status TEXT NOT NULL,
            user_id TEXT,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS exchange_rate (
            rate_date TEXT NOT NULL,
            currency_code TEXT NOT NULL,
            rate_to_usd REAL NOT NULL,
            PRIMARY KEY (rate_date, currency_code)
        )",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS monthly_revenue_summary (
            month TEXT PRIMARY KEY,
            mrr_usd REAL NOT NULL,
            active_subscriptions INTEGER NOT NULL
        )",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS subscriber (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            plan TEXT NOT NULL,
            signup_date TEXT NOT NULL,
            converted_date TEXT,
            expiry_date TEXT,
            status TEXT NOT NULL
        )",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS discord_daily_summary (
            day TEXT PRIMARY KEY,
            member_count INTEGER NOT NULL,
            message_count INTEGER NOT NULL,
            active_users INTEGER NOT NULL
        )",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS account_metrics_daily (
            day TEXT NOT NULL,
            platform TEXT NOT NULL,
            followers INTEGER NOT NULL,
            impressions INTEGER NOT NULL,
            engagements INTEGER NOT NULL,
            PRIMARY KEY (day, platform)
        )",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY,
            platform TEXT NOT NULL,
            posted_at TEXT NOT NULL,
            title TEXT NOT NULL,
            likes INTEGER NOT NULL DEFAULT 0,
            comments INTEGER NOT NULL DEFAULT 0,
            shares INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS demographic_metrics_daily (
            day TEXT NOT NULL,
            platform TEXT NOT NULL,
            segment TEXT NOT NULL,
            percentage REAL NOT NULL,
            PRIMARY KEY (day, platform, segment)
        )",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS dashboard_preference (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();

        let tables = [
            "unified_transactions",
            "exchange_rate",
            "monthly_revenue_summary",
            "subscriber",
            "discord_daily_summary",
            "account_metrics_daily",
            "posts",
            "demographic_metrics_daily",
            "dashboard_preference",
        ];

        for table in tables {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "table {table} was not created");
        }
    }

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
    }

    #[test]
    fn transaction_amounts_must_be_non_negative() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO unified_transactions
            (transaction_date, amount, currency, payment_provider, status, created_at)
            VALUES ('2025-01-01', -5.0, 'USD', 'stripe', 'completed', '2025-01-01')",
            (),
        );

        assert!(result.is_err(), "negative amount should be rejected");
    }
}
