//! The subscriptions dashboard: signup cohorts, conversion funnel, and churn
//! over time.

mod charts;
mod cohorts;
mod models;
mod page;
mod query;

pub use page::{SubscriptionsState, get_subscriptions_page};
