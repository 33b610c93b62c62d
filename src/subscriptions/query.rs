//! Database queries for the subscriptions dashboard.

use rusqlite::Connection;

use crate::Error;

use super::models::Subscriber;

/// Get every subscriber, oldest signup first.
pub(crate) fn get_all_subscribers(connection: &Connection) -> Result<Vec<Subscriber>, Error> {
    connection
        .prepare(
            "SELECT plan, signup_date, converted_date, expiry_date, status \
            FROM subscriber ORDER BY signup_date ASC, id ASC",
        )?
        .query_map([], |row| {
            Ok(Subscriber {
                plan: row.get(0)?,
                signup_date: row.get(1)?,
                converted_date: row.get(2)?,
                expiry_date: row.get(3)?,
                status: row.get(4)?,
            })
        })?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}
