/// Request extractors
///
/// [`ApiJson`] replaces `axum::Json` in handler arguments. A body that is not
/// JSON, lacks the JSON content type or does not fit the request type becomes
/// a `400` in the usual `{ "error": "bad_request", "message": ... }` shape
/// instead of axum's plain-text rejection.

use axum::extract::FromRequest;

use crate::error::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
