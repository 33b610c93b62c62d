//! The revenue dashboard: currency-converted, time-bucketed aggregation of
//! transaction rows, plus the optional MRR and churn summaries.

mod aggregation;
mod charts;
mod models;
mod page;
mod query;
mod tables;

pub use page::{RevenueState, get_revenue_page};
