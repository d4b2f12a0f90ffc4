//! Cookie directives produced by the manager.
//!
//! The manager does not touch HTTP types. It hands back a [`SessionCookie`]
//! describing what the transport layer should set on the response. The value
//! is the raw token; percent-encoding belongs to the transport's cookie codec.

use chrono::{DateTime, Utc};

/// A `Set-Cookie` directive for the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,

    /// The token, or empty when expiring the cookie.
    pub value: String,

    pub path: String,

    pub http_only: bool,

    /// Lifetime in seconds. Negative means "delete now".
    pub max_age: i64,

    /// Absolute expiry, set only when expiring the cookie.
    pub expires: Option<DateTime<Utc>>,
}

impl SessionCookie {
    /// Directive that hands `token` to the client for `max_age` seconds.
    pub fn issue(name: impl Into<String>, token: impl Into<String>, max_age: i64) -> Self {
        Self {
            name: name.into(),
            value: token.into(),
            path: "/".to_string(),
            http_only: true,
            max_age,
            expires: None,
        }
    }

    /// Directive that makes the client drop the cookie immediately.
    pub fn expire(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            path: "/".to_string(),
            http_only: true,
            max_age: -1,
            expires: DateTime::from_timestamp(0, 0),
        }
    }

    /// Whether this directive removes the cookie.
    pub fn is_removal(&self) -> bool {
        self.max_age < 0
    }
}
