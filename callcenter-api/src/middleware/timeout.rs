/// JSON body for timed-out requests
///
/// `tower_http::timeout::TimeoutLayer` answers `408` with an empty body. This
/// `map_response` function, layered outside it, swaps in the API error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

pub async fn timeout_as_json(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::Timeout.into_response();
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use std::time::Duration;
    use tower::ServiceExt;
    use tower_http::timeout::TimeoutLayer;

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_millis(500)).await;
        "done"
    }

    #[tokio::test]
    async fn test_timeout_has_json_body() {
        let response = Router::new()
            .route("/slow", get(slow))
            .layer(TimeoutLayer::new(Duration::from_millis(10)))
            .layer(axum::middleware::map_response(timeout_as_json))
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "request_timeout");
    }

    #[tokio::test]
    async fn test_other_responses_untouched() {
        let response = Router::new()
            .route("/", get(|| async { (StatusCode::CREATED, "made") }))
            .layer(axum::middleware::map_response(timeout_as_json))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
