//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1"
//! port = 8898
//!
//! [session]
//! provider = "memory"
//! cookie_name = "gosessionid"
//! max_lifetime_secs = 3600
//! ```

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// The `[session]` table is the session manager's own configuration.
pub use tessera_session::ManagerConfig as SessionConfig;

/// Default listener port.
pub const DEFAULT_PORT: u16 = 8898;

/// Default bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseraConfig {
    /// Server configuration.
    pub server: Option<ServerConfig>,

    /// Session manager configuration.
    pub session: Option<SessionConfig>,
}

impl TesseraConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: TesseraConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }
        if other.session.is_some() {
            self.session = other.session;
        }
    }

    /// The same config with every absent section filled with defaults.
    pub fn resolved(&self) -> Self {
        Self {
            server: Some(self.server()),
            session: Some(self.session()),
        }
    }

    /// Server section, or defaults if absent.
    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    /// Session section, or defaults if absent.
    pub fn session(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }

    /// Check every section for unusable values.
    pub fn validate(&self) -> Result<()> {
        self.session()
            .validate()
            .map_err(|e| ConfigError::Invalid {
                section: "session",
                reason: e.to_string(),
            })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Address to bind to.
    pub bind: String,
    /// Enable per-request tracing.
    pub request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            request_logging: true,
        }
    }
}
