//! Cookie parsing and formatting for authentication.

use axum::http::header;

/// Cookie name for the access token (short-lived, 30 minutes).
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// Cookie name for the refresh token (long-lived, 1 hour).
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// Max-Age for the access token cookie.
const ACCESS_COOKIE_MAX_AGE_SECS: u64 = 3600;

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Set-Cookie value for the access token.
pub fn access_cookie(token: &str, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        ACCESS_COOKIE_NAME,
        token,
        ACCESS_COOKIE_MAX_AGE_SECS,
        secure_suffix(secure)
    )
}

/// Set-Cookie value for the refresh token. No Max-Age: a session cookie,
/// discarded when the browser closes.
pub fn refresh_cookie(token: &str, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/{}",
        REFRESH_COOKIE_NAME,
        token,
        secure_suffix(secure)
    )
}

/// Set-Cookie value that clears `name` (expiry in the past).
pub fn clear_cookie(name: &str, secure: bool) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0{}",
        name,
        secure_suffix(secure)
    )
}

fn secure_suffix(secure: bool) -> &'static str {
    if secure { "; Secure" } else { "" }
}
