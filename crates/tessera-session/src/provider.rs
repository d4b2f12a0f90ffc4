//! Storage contract for session backends and the registry that names them.
//!
//! The [`Manager`](crate::Manager) never talks to a concrete backend. It looks
//! a [`Provider`] up by name in a [`ProviderRegistry`] built at startup, which
//! keeps backends swappable and lets tests register fakes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::DEFAULT_PROVIDER;
use crate::error::{Error, Result};
use crate::memory::MemoryProvider;
use crate::store::SessionStore;

/// Trait for session storage backends.
///
/// Implementations must be safe under arbitrary interleavings of all
/// operations from concurrent request handlers and the GC task.
pub trait Provider: Send + Sync {
    /// Create an empty session for `token` and make it the most recent.
    ///
    /// An existing session under the same token is replaced.
    fn init(&self, token: &str) -> Arc<SessionStore>;

    /// Return the session for `token`, creating an empty one if unknown.
    ///
    /// Looking a session up does not by itself change its recency.
    fn read(&self, token: &str) -> Arc<SessionStore>;

    /// Remove the session for `token`. Unknown tokens are ignored.
    fn destroy(&self, token: &str);

    /// Mark `store` as accessed now and make it the most recent.
    ///
    /// Called by [`SessionStore`] on every get/set/delete. Ignored unless
    /// `store` is the session currently held under its token, so a store
    /// that was destroyed or replaced cannot refresh its successor.
    fn update(&self, store: &SessionStore);

    /// Remove every session idle for longer than `max_lifetime`.
    ///
    /// Returns the number of sessions removed.
    fn gc(&self, max_lifetime: Duration) -> usize;

    /// Number of live sessions.
    fn len(&self) -> usize;

    /// Whether no sessions are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Name-to-provider mapping, populated once at startup.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with a fresh [`MemoryProvider`] under `"memory"`.
    pub fn with_memory() -> Self {
        let mut registry = Self::new();
        registry
            .providers
            .insert(DEFAULT_PROVIDER.to_string(), MemoryProvider::new());
        registry
    }

    /// Register `provider` under `name`.
    ///
    /// Registering the same name twice is a configuration error.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) -> Result<()> {
        let name = name.into();
        if self.providers.contains_key(&name) {
            return Err(Error::DuplicateProvider(name));
        }
        debug!(provider = %name, "Registered session provider");
        self.providers.insert(name, provider);
        Ok(())
    }

    /// Look up a provider by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Provider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ProviderNotFound(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
