//! Row structs for the revenue pipeline.

use time::Date;

/// A completed payment, as read from the unified_transactions table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    /// When the payment happened.
    pub(crate) date: Date,
    /// The amount paid, in `currency`.
    pub(crate) amount: f64,
    /// ISO 4217 code of the currency the payment was made in.
    pub(crate) currency: String,
    /// The payment provider that processed the payment.
    pub(crate) payment_provider: String,
    /// The subscription plan paid for, if any.
    pub(crate) subscription_plan: Option<String>,
}

/// One row of the precomputed monthly_revenue_summary view.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthlyRevenueSummary {
    /// The first day of the summarized month.
    pub(crate) month: Date,
    /// Monthly recurring revenue in USD.
    pub(crate) mrr_usd: f64,
    /// Number of subscriptions active during the month.
    pub(crate) active_subscriptions: i64,
}
