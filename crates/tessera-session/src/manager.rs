//! Correlates clients to sessions through their cookie token.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ManagerConfig;
use crate::cookie::SessionCookie;
use crate::error::Result;
use crate::gc::spawn_gc_task;
use crate::provider::{Provider, ProviderRegistry};
use crate::store::SessionStore;
use crate::token::generate_token;

/// Session manager.
///
/// Holds the provider selected from a [`ProviderRegistry`] and the cookie
/// policy. All session state lives in the provider.
pub struct Manager {
    provider: Arc<dyn Provider>,
    cookie_name: String,
    max_lifetime: Duration,
    /// Serialises correlate/invalidate.
    lock: Mutex<()>,
}

impl Manager {
    /// Create a manager backed by the provider registered as `provider_name`.
    pub fn new(
        registry: &ProviderRegistry,
        provider_name: &str,
        cookie_name: impl Into<String>,
        max_lifetime_secs: u64,
    ) -> Result<Self> {
        let config = ManagerConfig::new()
            .with_provider(provider_name)
            .with_cookie_name(cookie_name)
            .with_max_lifetime_secs(max_lifetime_secs);
        Self::from_config(registry, &config)
    }

    /// Create a manager from a [`ManagerConfig`], the `[session]` config table.
    pub fn from_config(registry: &ProviderRegistry, config: &ManagerConfig) -> Result<Self> {
        config.validate()?;

        let provider = registry.get(&config.provider)?;
        debug!(
            provider = %config.provider,
            cookie = %config.cookie_name,
            max_lifetime_secs = config.max_lifetime.as_secs(),
            "Session manager created"
        );

        Ok(Self {
            provider,
            cookie_name: config.cookie_name.clone(),
            max_lifetime: config.max_lifetime,
            lock: Mutex::new(()),
        })
    }

    /// Name of the cookie carrying the token.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn max_lifetime(&self) -> Duration {
        self.max_lifetime
    }

    /// The backing provider.
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Find or start the session for a request.
    ///
    /// `request_token` is the cookie value as decoded by the transport, if
    /// the request carried one. Without a token a new session is started and
    /// a cookie directive is returned to hand its token to the client. With a token the matching
    /// session is returned; an unknown token starts an empty session under
    /// that token, and no cookie is set.
    pub fn correlate(
        &self,
        request_token: Option<&str>,
    ) -> Result<(Arc<SessionStore>, Option<SessionCookie>)> {
        let _guard = self.lock.lock();

        match request_token.filter(|t| !t.is_empty()) {
            None => {
                let token = generate_token()?;
                let session = self.provider.init(&token);
                let cookie =
                    SessionCookie::issue(&self.cookie_name, token, self.max_lifetime_secs());
                debug!(sessions = self.provider.len(), "Issued new session");
                Ok((session, Some(cookie)))
            }
            Some(token) => Ok((self.provider.read(token), None)),
        }
    }

    /// Destroy the session for a request and expire its cookie.
    ///
    /// Returns `None` when the request carried no token.
    pub fn invalidate(&self, request_token: Option<&str>) -> Option<SessionCookie> {
        let token = request_token.filter(|t| !t.is_empty())?;
        let _guard = self.lock.lock();

        self.provider.destroy(token);
        debug!(sessions = self.provider.len(), "Session invalidated");
        Some(SessionCookie::expire(&self.cookie_name))
    }

    /// Run one GC sweep now. Returns the number of sessions removed.
    pub fn run_gc(&self) -> usize {
        self.provider.gc(self.max_lifetime)
    }

    /// Start the periodic GC task, sweeping every max lifetime until
    /// `shutdown` is cancelled.
    pub fn spawn_gc(&self, shutdown: CancellationToken) -> JoinHandle<()> {
        spawn_gc_task(Arc::clone(&self.provider), self.max_lifetime, shutdown)
    }

    fn max_lifetime_secs(&self) -> i64 {
        i64::try_from(self.max_lifetime.as_secs()).unwrap_or(i64::MAX)
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("cookie_name", &self.cookie_name)
            .field("max_lifetime", &self.max_lifetime)
            .finish_non_exhaustive()
    }
}
