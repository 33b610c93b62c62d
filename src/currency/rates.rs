//! The exchange-rate table and its three-stage loading chain.

use std::{collections::HashMap, sync::Mutex};

use rusqlite::Connection;
use time::Date;

use crate::Error;

/// Hardcoded rates used when the exchange_rate table yields nothing at all.
const FALLBACK_RATES: [(&str, f64); 3] = [("VND", 26100.0), ("EUR", 0.92), ("GBP", 0.79)];

/// A flat map from currency code to units of that currency per 1 USD.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Build a rate table from `currency_code -> rate_to_usd` pairs.
    pub fn new(rates: HashMap<String, f64>) -> Self {
        Self { rates }
    }

    /// The hardcoded last-resort table.
    pub fn fallback() -> Self {
        Self::new(
            FALLBACK_RATES
                .into_iter()
                .map(|(code, rate)| (code.to_owned(), rate))
                .collect(),
        )
    }

    /// Convert `amount` in `from_currency` to USD.
    ///
    /// USD passes through unchanged. When no rate is cached for
    /// `from_currency`, a warning is logged and the amount is returned
    /// unconverted; a missing rate is a degradation, not an error.
    pub fn to_usd(&self, amount: f64, from_currency: &str) -> f64 {
        if from_currency == "USD" {
            return amount;
        }

        match self.rates.get(from_currency) {
            Some(rate) => amount / rate,
            None => {
                tracing::warn!("no exchange rate for {from_currency}, leaving amount unconverted");
                amount
            }
        }
    }

    /// Convert a USD amount to `to_currency`. Symmetric with [Self::to_usd],
    /// including the fallback on a missing rate.
    pub fn to_display(&self, amount_usd: f64, to_currency: &str) -> f64 {
        if to_currency == "USD" {
            return amount_usd;
        }

        match self.rates.get(to_currency) {
            Some(rate) => amount_usd * rate,
            None => {
                tracing::warn!("no exchange rate for {to_currency}, leaving amount unconverted");
                amount_usd
            }
        }
    }
}

/// Load the rate table, trying progressively staler sources.
///
/// 1. Today's rate rows.
/// 2. The 10 most recent rate rows, keeping whichever appears first per
///    currency.
/// 3. The hardcoded fallback table.
///
/// Loading never fails; each downgrade is logged as a warning.
pub fn load_rate_table(connection: &Connection, today: Date) -> RateTable {
    match load_rates_for_day(connection, today) {
        Ok(rates) if !rates.is_empty() => return RateTable::new(rates),
        Ok(_) => {
            tracing::warn!("no exchange rates for {today}, falling back to the most recent rows")
        }
        Err(error) => tracing::warn!("could not load today's exchange rates: {error}"),
    }

    match load_most_recent_rates(connection) {
        Ok(rates) if !rates.is_empty() => return RateTable::new(rates),
        Ok(_) => tracing::warn!("exchange rate table is empty, using hardcoded fallback rates"),
        Err(error) => {
            tracing::warn!("could not load recent exchange rates: {error}, using hardcoded fallback")
        }
    }

    RateTable::fallback()
}

/// Get the session rate table, loading it on first use.
///
/// The table lives for the rest of the server process; restart to pick up
/// fresh rates.
pub fn session_rate_table(
    cache: &Mutex<Option<RateTable>>,
    connection: &Connection,
    today: Date,
) -> Result<RateTable, Error> {
    let mut cache = cache.lock().map_err(|_| Error::DatabaseLockError)?;

    if let Some(table) = cache.as_ref() {
        return Ok(table.clone());
    }

    let table = load_rate_table(connection, today);
    *cache = Some(table.clone());

    Ok(table)
}

fn load_rates_for_day(
    connection: &Connection,
    day: Date,
) -> Result<HashMap<String, f64>, rusqlite::Error> {
    connection
        .prepare("SELECT currency_code, rate_to_usd FROM exchange_rate WHERE rate_date = ?1")?
        .query_map([day.to_string()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect()
}

fn load_most_recent_rates(
    connection: &Connection,
) -> Result<HashMap<String, f64>, rusqlite::Error> {
    let rows: Vec<(String, f64)> = connection
        .prepare(
            "SELECT currency_code, rate_to_usd FROM exchange_rate \
            ORDER BY rate_date DESC LIMIT 10",
        )?
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<Result<_, _>>()?;

    let mut rates = HashMap::new();
    // Rows are newest first, so only the first hit per currency counts.
    for (code, rate) in rows {
        rates.entry(code).or_insert(rate);
    }

    Ok(rates)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::db::initialize;

    use super::{RateTable, load_rate_table, session_rate_table};

    fn fixed_table() -> RateTable {
        RateTable::new(HashMap::from([
            ("VND".to_owned(), 26100.0),
            ("EUR".to_owned(), 0.92),
        ]))
    }

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert_rate(conn: &Connection, rate_date: &str, code: &str, rate: f64) {
        conn.execute(
            "INSERT INTO exchange_rate (rate_date, currency_code, rate_to_usd) \
            VALUES (?1, ?2, ?3)",
            rusqlite::params![rate_date, code, rate],
        )
        .unwrap();
    }

    #[test]
    fn usd_is_identity_in_both_directions() {
        let table = fixed_table();

        assert_eq!(table.to_usd(123.45, "USD"), 123.45);
        assert_eq!(table.to_display(123.45, "USD"), 123.45);
    }

    #[test]
    fn vnd_converts_at_the_table_rate() {
        let table = fixed_table();

        assert_eq!(table.to_display(1.0, "VND"), 26100.0);
        assert_eq!(table.to_usd(26100.0, "VND"), 1.0);
    }

    #[test]
    fn round_trip_is_lossless_within_tolerance() {
        let table = fixed_table();

        for currency in ["VND", "EUR"] {
            for amount in [0.01, 1.0, 999.99, 1_000_000.0] {
                let round_tripped = table.to_usd(table.to_display(amount, currency), currency);
                assert!(
                    (round_tripped - amount).abs() < 1e-9 * amount.max(1.0),
                    "{amount} {currency} round-tripped to {round_tripped}"
                );
            }
        }
    }

    #[test]
    fn missing_rate_passes_amount_through() {
        let table = fixed_table();

        assert_eq!(table.to_usd(50.0, "JPY"), 50.0);
        assert_eq!(table.to_display(50.0, "JPY"), 50.0);
    }

    #[test]
    fn prefers_todays_rates() {
        let conn = get_test_connection();
        insert_rate(&conn, "2025-06-01", "VND", 25000.0);
        insert_rate(&conn, "2025-06-02", "VND", 26100.0);

        let table = load_rate_table(&conn, date!(2025 - 06 - 02));

        assert_eq!(table.to_display(1.0, "VND"), 26100.0);
    }

    #[test]
    fn falls_back_to_most_recent_rate_per_currency() {
        let conn = get_test_connection();
        insert_rate(&conn, "2025-05-30", "VND", 25000.0);
        insert_rate(&conn, "2025-05-31", "VND", 25500.0);
        insert_rate(&conn, "2025-05-31", "EUR", 0.93);

        // No rows for today, so the newest row per currency wins.
        let table = load_rate_table(&conn, date!(2025 - 06 - 02));

        assert_eq!(table.to_display(1.0, "VND"), 25500.0);
        assert_eq!(table.to_display(1.0, "EUR"), 0.93);
    }

    #[test]
    fn empty_table_yields_hardcoded_fallback() {
        let conn = get_test_connection();

        let table = load_rate_table(&conn, date!(2025 - 06 - 02));

        assert_eq!(table, RateTable::fallback());
        assert_eq!(table.to_display(1.0, "VND"), 26100.0);
        assert_eq!(table.to_display(1.0, "GBP"), 0.79);
    }

    #[test]
    fn session_cache_loads_once() {
        let conn = get_test_connection();
        insert_rate(&conn, "2025-06-02", "VND", 26100.0);
        let cache = Mutex::new(None);

        let first = session_rate_table(&cache, &conn, date!(2025 - 06 - 02)).unwrap();

        // Later rows must not change the cached table.
        insert_rate(&conn, "2025-06-03", "VND", 30000.0);
        let second = session_rate_table(&cache, &conn, date!(2025 - 06 - 03)).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.to_display(1.0, "VND"), 26100.0);
    }
}
