//! Alert partials for surfacing success and error messages on form posts.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

fn alert_view(container_style: &str, message: &str, details: &str) -> Markup {
    html!(
        div class=(container_style) role="alert"
        {
            p class="font-semibold" { (message) }

            @if !details.is_empty() {
                p class="text-sm" { (details) }
            }
        }
    )
}

/// Render a success alert partial.
pub fn alert_success(message: &str, details: &str) -> Response {
    let markup = alert_view(
        "p-4 mb-4 rounded-lg bg-green-50 text-green-800 \
        dark:bg-gray-800 dark:text-green-400",
        message,
        details,
    );

    (StatusCode::OK, markup).into_response()
}

/// Render an error alert partial with the given status code.
pub fn alert_error(status: StatusCode, message: &str, details: &str) -> Response {
    let markup = alert_view(
        "p-4 mb-4 rounded-lg bg-red-50 text-red-800 \
        dark:bg-gray-800 dark:text-red-400",
        message,
        details,
    );

    (status, markup).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use scraper::{Html, Selector};

    use super::{alert_error, alert_success};

    async fn response_html(response: axum::response::Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Html::parse_fragment(&String::from_utf8_lossy(&body))
    }

    #[tokio::test]
    async fn success_alert_contains_message() {
        let response = alert_success("Report sent", "Check your inbox.");
        assert_eq!(response.status(), StatusCode::OK);

        let html = response_html(response).await;
        let selector = Selector::parse("div[role='alert']").unwrap();
        let alert = html.select(&selector).next().expect("no alert rendered");
        let text: String = alert.text().collect();
        assert!(text.contains("Report sent"));
        assert!(text.contains("Check your inbox."));
    }

    #[tokio::test]
    async fn error_alert_uses_given_status() {
        let response = alert_error(StatusCode::BAD_GATEWAY, "Report Not Sent", "");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
