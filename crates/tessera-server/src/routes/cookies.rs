//! Plain cookie endpoints, independent of sessions.

use axum::extract::Query;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::Deserialize;
use tracing::debug;

/// Query parameters for GET /set.
#[derive(Debug, Deserialize)]
pub struct SetCookieParams {
    /// Cookie name (default `username`).
    pub name: Option<String>,
    /// Cookie value (default `guest`).
    pub value: Option<String>,
}

/// GET /read - Echo every cookie the request carried, one `name: value` per line.
pub async fn read_cookies_handler(jar: CookieJar) -> String {
    let mut out = String::new();
    for cookie in jar.iter() {
        debug!(name = %cookie.name(), "Echoing request cookie");
        out.push_str(cookie.name());
        out.push_str(": ");
        out.push_str(cookie.value());
        out.push('\n');
    }
    out
}

/// GET /set - Set a plain cookie on the client.
pub async fn set_cookie_handler(
    jar: CookieJar,
    Query(params): Query<SetCookieParams>,
) -> CookieJar {
    let name = params.name.unwrap_or_else(|| "username".to_string());
    let value = params.value.unwrap_or_else(|| "guest".to_string());
    jar.add(Cookie::new(name, value))
}
