//! Row structs for the subscriptions dashboard.

use time::Date;

/// Status value marking a subscriber whose subscription has lapsed.
pub(super) const STATUS_CHURNED: &str = "churned";

/// Status value marking a subscriber with a current subscription.
pub(super) const STATUS_ACTIVE: &str = "active";

/// One row of the subscriber table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Subscriber {
    /// The plan the subscriber signed up for.
    pub(crate) plan: String,
    /// When the subscriber created their account.
    pub(crate) signup_date: Date,
    /// When the subscriber first paid, if they ever did.
    pub(crate) converted_date: Option<Date>,
    /// When the subscription lapsed or will lapse.
    pub(crate) expiry_date: Option<Date>,
    /// The lifecycle status, e.g. "active", "trialing", or "churned".
    pub(crate) status: String,
}
