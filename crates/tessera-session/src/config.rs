//! Configuration for the session manager.
//!
//! [`ManagerConfig`] doubles as the `[session]` table of the config file,
//! where the lifetime is written in whole seconds:
//!
//! ```toml
//! [session]
//! provider = "memory"
//! cookie_name = "gosessionid"
//! max_lifetime_secs = 3600
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name the in-memory provider is registered under.
pub const DEFAULT_PROVIDER: &str = "memory";

/// Default cookie carrying the session token.
pub const DEFAULT_COOKIE_NAME: &str = "gosessionid";

/// Default inactivity window before a session is collected (one hour).
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(3600);

/// Configuration for a [`Manager`](crate::Manager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Registry name of the provider backing the manager.
    pub provider: String,

    /// Name of the cookie that carries the session token.
    pub cookie_name: String,

    /// How long a session may stay idle before GC removes it.
    /// Also used as the cookie max-age and as the GC period.
    #[serde(rename = "max_lifetime_secs", with = "whole_secs")]
    pub max_lifetime: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            max_lifetime: DEFAULT_MAX_LIFETIME,
        }
    }
}

impl ManagerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the provider by registry name.
    pub fn with_provider(mut self, name: impl Into<String>) -> Self {
        self.provider = name.into();
        self
    }

    /// Set the cookie name.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set the max lifetime.
    pub fn with_max_lifetime(mut self, max_lifetime: Duration) -> Self {
        self.max_lifetime = max_lifetime;
        self
    }

    /// Set the max lifetime in whole seconds.
    pub fn with_max_lifetime_secs(self, secs: u64) -> Self {
        self.with_max_lifetime(Duration::from_secs(secs))
    }

    /// Reject values a manager cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.cookie_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "cookie_name must not be empty".to_string(),
            ));
        }
        if self.max_lifetime.is_zero() {
            return Err(Error::InvalidConfig(
                "max_lifetime_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// `Duration` stored as an integer number of seconds.
mod whole_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
