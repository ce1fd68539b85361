/// Session cookie rendering
///
/// The cookie value is the opaque session token. Name, path, max-age and
/// the Secure/HttpOnly flags all come from configuration.
///
/// ```text
/// Set-Cookie: session-id=<token>; Path=/; Max-Age=3600; HttpOnly; SameSite=Lax
/// ```

use axum::http::{header, HeaderValue};
use axum::response::{AppendHeaders, IntoResponseParts};

use crate::config::Config;
use crate::error::ApiError;

/// Builds the `Set-Cookie` value for a new session
pub fn session_cookie(config: &Config, token: &str) -> String {
    render(config, token, config.cookie_max_age())
}

/// Builds the `Set-Cookie` value that clears the session cookie
pub fn clear_session_cookie(config: &Config) -> String {
    render(config, "", 0)
}

fn render(config: &Config, value: &str, max_age: u64) -> String {
    let mut cookie = format!(
        "{}={}; Path={}; Max-Age={}",
        config.session.name, value, config.cookie.path, max_age
    );

    if config.cookie.secure {
        cookie.push_str("; Secure");
    }
    if config.cookie.http_only {
        cookie.push_str("; HttpOnly");
    }
    cookie.push_str("; SameSite=Lax");

    cookie
}

/// Response header part setting `cookie`
pub fn set_cookie(cookie: String) -> Result<impl IntoResponseParts, ApiError> {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::InternalError(format!("Invalid Set-Cookie header: {}", e)))?;

    Ok(AppendHeaders([(header::SET_COOKIE, value)]))
}
