//! Row structs for the transactions browser.

use serde::Serialize;
use time::Date;

/// One row of the unified_transactions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TransactionRow {
    /// The database row ID.
    pub(crate) id: i64,
    /// When the payment happened.
    pub(crate) transaction_date: Date,
    /// The amount paid, in `currency`.
    pub(crate) amount: f64,
    /// ISO 4217 code of the currency the payment was made in.
    pub(crate) currency: String,
    /// The payment provider that processed the payment.
    pub(crate) payment_provider: String,
    /// The subscription plan paid for, if any.
    pub(crate) subscription_plan: Option<String>,
    /// The lifecycle status, e.g. "completed" or "refunded".
    pub(crate) status: String,
    /// The paying user's ID in the upstream system, when known.
    pub(crate) user_id: Option<String>,
    /// When the row was ingested.
    pub(crate) created_at: String,
}
