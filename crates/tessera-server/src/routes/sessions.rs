//! Session-backed endpoints.
//!
//! Every handler here starts by correlating the request's token cookie to a
//! session through the [`Manager`](tessera_session::Manager), and forwards
//! any cookie directive the manager produced onto the response.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use tessera_session::{SessionCookie, SessionStore, SessionValue};

use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Key the visit counter is stored under.
pub const COUNTER_KEY: &str = "countnum";

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Snapshot of the caller's session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Session token.
    pub id: String,
    /// Last access time (ISO 8601).
    pub last_accessed: String,
    /// Stored values.
    pub values: BTreeMap<String, SessionValue>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Token cookie carried by the request, if any.
///
/// The jar has already percent-decoded the value.
fn request_token<'a>(state: &AppState, jar: &'a CookieJar) -> Option<&'a str> {
    jar.get(state.manager.cookie_name()).map(|c| c.value())
}

/// Correlate the request to its session.
pub fn start_session(
    state: &AppState,
    jar: &CookieJar,
) -> Result<(Arc<SessionStore>, Option<SessionCookie>)> {
    Ok(state.manager.correlate(request_token(state, jar))?)
}

/// Build the response cookie for a manager directive.
///
/// A negative max-age becomes `Max-Age=0`, which is how browsers are told to
/// discard a cookie.
pub fn session_cookie(directive: SessionCookie) -> Cookie<'static> {
    let mut builder = Cookie::build((directive.name, directive.value))
        .path(directive.path)
        .http_only(directive.http_only)
        .max_age(Duration::seconds(directive.max_age.max(0)));
    if let Some(at) = directive
        .expires
        .and_then(|at| OffsetDateTime::from_unix_timestamp(at.timestamp()).ok())
    {
        builder = builder.expires(at);
    }
    builder.build()
}

/// Respond with `body`, setting the session cookie if the manager asked for one.
pub fn with_cookie(
    jar: CookieJar,
    directive: Option<SessionCookie>,
    body: impl IntoResponse,
) -> Response {
    let jar = match directive {
        Some(directive) => jar.add(session_cookie(directive)),
        None => jar,
    };
    (jar, body).into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /count - Increment and return the caller's visit counter.
pub async fn count_handler(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let (session, cookie) = start_session(&state, &jar)?;

    let next = match session.get(COUNTER_KEY) {
        None => 1,
        Some(value) => value.as_int().ok_or_else(|| {
            ServerError::BadRequest(format!(
                "'{}' holds a {}, not a number",
                COUNTER_KEY,
                value.kind()
            ))
        })? + 1,
    };
    session.set(COUNTER_KEY, next);

    debug!(count = next, "Visit counted");
    Ok(with_cookie(jar, cookie, format!("{}: {}", COUNTER_KEY, next)))
}

/// GET /session - Show the caller's session without changing it.
pub async fn session_handler(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let (session, cookie) = start_session(&state, &jar)?;

    let snapshot = SessionSnapshot {
        id: session.id().to_string(),
        last_accessed: session.last_accessed().to_rfc3339(),
        values: session.snapshot(),
    };

    Ok(with_cookie(jar, cookie, Json(snapshot)))
}

/// POST /logout - Destroy the caller's session and expire its cookie.
pub async fn logout_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    let cookie = state.manager.invalidate(request_token(&state, &jar));
    with_cookie(jar, cookie, StatusCode::NO_CONTENT)
}
