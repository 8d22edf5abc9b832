/// Security headers middleware
///
/// Adds a fixed set of response headers to everything the router returns.
///
/// # Headers Applied
///
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
/// - `Cache-Control: no-store` (unless the handler set one)
/// - `Strict-Transport-Security` (production only)
///
/// # Example
///
/// ```
/// use axum::{routing::get, Router};
/// use callcenter_api::middleware::security::security_headers;
///
/// let production = false;
/// let app: Router = Router::new()
///     .route("/", get(|| async { "ok" }))
///     .layer(axum::middleware::from_fn_with_state(production, security_headers));
/// ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

const HSTS: HeaderValue = HeaderValue::from_static("max-age=31536000; includeSubDomains");

/// Middleware function; the state is the production flag
pub async fn security_headers(
    State(production): State<bool>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    // Responses carry session tokens and customer data
    headers
        .entry(header::CACHE_CONTROL)
        .or_insert(HeaderValue::from_static("no-store"));

    if production {
        headers.insert(header::STRICT_TRANSPORT_SECURITY, HSTS);
    }

    response
}
