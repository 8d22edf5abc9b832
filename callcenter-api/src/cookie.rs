/// The `token` session cookie
///
/// The browser client reads the token from script, so the cookie is not
/// `HttpOnly`. It is `SameSite=Strict` and, in production, `Secure`.

use axum::http::{header, HeaderName, HeaderValue};

use crate::error::{ApiError, ApiResult};

pub const SESSION_COOKIE: &str = "token";

/// `Set-Cookie` header carrying a session token
pub fn session_cookie(token: &str, secure: bool) -> ApiResult<(HeaderName, HeaderValue)> {
    let mut cookie = format!("{}={}; Path=/; SameSite=Strict", SESSION_COOKIE, token);
    if secure {
        cookie.push_str("; Secure");
    }

    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::InternalError(format!("Unusable session cookie: {}", e)))?;

    Ok((header::SET_COOKIE, value))
}

/// `Set-Cookie` header that makes the browser drop the session cookie
pub fn clear_session_cookie() -> (HeaderName, HeaderValue) {
    (
        header::SET_COOKIE,
        HeaderValue::from_static(
            "token=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        ),
    )
}
