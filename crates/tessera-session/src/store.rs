//! A single client's session bag.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Weak;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::provider::Provider;
use crate::value::SessionValue;

/// Key/value state for one session, plus its token and last-access time.
///
/// Stores are created by a [`Provider`] and handed out as `Arc<SessionStore>`.
/// Every [`get`](Self::get), [`set`](Self::set) and [`delete`](Self::delete)
/// reports the access back to the owning provider so the session moves to the
/// head of its recency order. Once the provider is gone, or the session was
/// destroyed or replaced, those reports are silently dropped.
pub struct SessionStore {
    id: String,
    last_accessed: Mutex<DateTime<Utc>>,
    values: Mutex<HashMap<String, SessionValue>>,
    owner: Weak<dyn Provider>,
}

impl SessionStore {
    /// Create an empty store owned by `owner`, timestamped now.
    pub fn new(id: impl Into<String>, owner: Weak<dyn Provider>) -> Self {
        Self {
            id: id.into(),
            last_accessed: Mutex::new(Utc::now()),
            values: Mutex::new(HashMap::new()),
            owner,
        }
    }

    /// The session token. Never changes.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Insert or overwrite a value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<SessionValue>) {
        self.values.lock().insert(key.into(), value.into());
        self.notify_owner();
    }

    /// Get a value, or `None` if the key is unset.
    ///
    /// Reads count as activity and keep the session alive.
    pub fn get(&self, key: &str) -> Option<SessionValue> {
        let value = self.values.lock().get(key).cloned();
        self.notify_owner();
        value
    }

    /// Remove a value. Removing an unset key is not an error.
    pub fn delete(&self, key: &str) {
        self.values.lock().remove(key);
        self.notify_owner();
    }

    /// When the session was last accessed.
    pub fn last_accessed(&self) -> DateTime<Utc> {
        *self.last_accessed.lock()
    }

    /// Record an access at `at`.
    ///
    /// Providers call this while holding their own lock, so that the
    /// timestamp and the recency order change together.
    pub fn touch(&self, at: DateTime<Utc>) {
        *self.last_accessed.lock() = at;
    }

    /// Number of stored keys. Does not count as an access.
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Whether the store holds no values. Does not count as an access.
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }

    /// Sorted list of stored keys. Does not count as an access.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Copy of all values. Does not count as an access.
    pub fn snapshot(&self) -> BTreeMap<String, SessionValue> {
        self.values
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn notify_owner(&self) {
        if let Some(provider) = self.owner.upgrade() {
            provider.update(self);
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("id", &self.id)
            .field("last_accessed", &self.last_accessed())
            .field("len", &self.len())
            .finish()
    }
}
