//! The application's route URIs.

/// The root route which redirects to the revenue dashboard.
pub const ROOT: &str = "/";
/// The revenue dashboard page.
pub const REVENUE_VIEW: &str = "/revenue";
/// The page for browsing and filtering transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for subscription cohorts, churn, and the conversion funnel.
pub const SUBSCRIPTIONS_VIEW: &str = "/subscriptions";
/// The page for social-media metrics.
pub const SOCIAL_VIEW: &str = "/social";
/// The page for SAT test-center seat availability.
pub const SAT_VIEW: &str = "/sat-centers";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route that downloads the filtered transaction list as CSV.
pub const EXPORT_TRANSACTIONS: &str = "/transactions/export";
/// The route that emails a report of the filtered transaction list.
pub const REPORT_TRANSACTIONS: &str = "/api/transactions/report";
/// The route to update the display-currency preference.
pub const DISPLAY_CURRENCY: &str = "/api/preferences/display-currency";

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::REVENUE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SUBSCRIPTIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SOCIAL_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SAT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
        assert_endpoint_is_valid_uri(endpoints::EXPORT_TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::REPORT_TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::DISPLAY_CURRENCY);
    }
}
