//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    currency::set_display_currency,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    revenue::get_revenue_page,
    sat::get_sat_page,
    social::get_social_page,
    subscriptions::get_subscriptions_page,
    transactions::{export_transactions_csv, get_transactions_page, send_transaction_report},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::REVENUE_VIEW, get(get_revenue_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::EXPORT_TRANSACTIONS, get(export_transactions_csv))
        .route(
            endpoints::REPORT_TRANSACTIONS,
            post(send_transaction_report),
        )
        .route(endpoints::DISPLAY_CURRENCY, post(set_display_currency))
        .route(endpoints::SUBSCRIPTIONS_VIEW, get(get_subscriptions_page))
        .route(endpoints::SOCIAL_VIEW, get(get_social_page))
        .route(endpoints::SAT_VIEW, get(get_sat_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the revenue page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::REVENUE_VIEW)
}
