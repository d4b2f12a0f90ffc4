//! HTTP routes.

pub mod cookies;
pub mod health;
pub mod sessions;

pub use cookies::{SetCookieParams, read_cookies_handler, set_cookie_handler};
pub use health::{HealthResponse, health_routes};
pub use sessions::{
    COUNTER_KEY, SessionSnapshot, count_handler, logout_handler, session_cookie, session_handler,
    start_session, with_cookie,
};
