//! The social dashboard: Discord activity, per-platform account metrics,
//! top posts, and audience demographics.

mod aggregation;
mod charts;
mod models;
mod page;
mod query;

pub use page::{SocialState, get_social_page};
