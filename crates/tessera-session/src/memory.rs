//! In-memory session provider with recency-ordered expiry.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::provider::Provider;
use crate::store::SessionStore;

/// Session provider that keeps every session in process memory.
///
/// Sessions live in an unbounded [`LruCache`], which serves as both the token
/// index and the recency order: the most recently accessed session sits at
/// the head, the stalest at the tail. GC therefore only has to pop expired
/// entries off the tail and can stop at the first live one.
///
/// A single mutex guards the whole structure for every operation.
pub struct MemoryProvider {
    sessions: Mutex<LruCache<String, Arc<SessionStore>>>,
    this: Weak<MemoryProvider>,
}

impl MemoryProvider {
    /// Create an empty provider.
    ///
    /// Returned as an `Arc` because every store it hands out keeps a weak
    /// reference back to it for recency updates.
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            sessions: Mutex::new(LruCache::unbounded()),
            this: this.clone(),
        })
    }

    /// Tokens from most to least recently accessed.
    pub fn recency_order(&self) -> Vec<String> {
        self.sessions
            .lock()
            .iter()
            .map(|(token, _)| token.clone())
            .collect()
    }

    /// Whether `token` currently has a session.
    pub fn contains(&self, token: &str) -> bool {
        self.sessions.lock().contains(token)
    }

    fn insert_new(
        &self,
        sessions: &mut LruCache<String, Arc<SessionStore>>,
        token: &str,
    ) -> Arc<SessionStore> {
        let owner: Weak<dyn Provider> = self.this.clone();
        let store = Arc::new(SessionStore::new(token, owner));
        if sessions.put(token.to_string(), Arc::clone(&store)).is_some() {
            debug!("Session token reused, previous session replaced");
        }
        trace!(sessions = sessions.len(), "Session created");
        store
    }

    /// Pretend `token` was last accessed `age` ago, without moving it.
    #[cfg(test)]
    pub(crate) fn backdate(&self, token: &str, age: Duration) {
        let sessions = self.sessions.lock();
        if let Some(store) = sessions.peek(token) {
            let age = chrono::TimeDelta::from_std(age).unwrap();
            store.touch(Utc::now() - age);
        }
    }
}

impl Provider for MemoryProvider {
    fn init(&self, token: &str) -> Arc<SessionStore> {
        let mut sessions = self.sessions.lock();
        self.insert_new(&mut sessions, token)
    }

    fn read(&self, token: &str) -> Arc<SessionStore> {
        let mut sessions = self.sessions.lock();
        if let Some(store) = sessions.peek(token) {
            return Arc::clone(store);
        }
        trace!("Unknown session token, starting empty session");
        self.insert_new(&mut sessions, token)
    }

    fn destroy(&self, token: &str) {
        if self.sessions.lock().pop(token).is_some() {
            debug!("Session destroyed");
        }
    }

    fn update(&self, store: &SessionStore) {
        let mut sessions = self.sessions.lock();
        let live = sessions
            .peek(store.id())
            .is_some_and(|current| std::ptr::eq(current.as_ref(), store));
        if !live {
            trace!("Access to a detached session, recency unchanged");
            return;
        }
        sessions.promote(store.id());
        store.touch(Utc::now());
        trace!("Session moved to the head of the recency order");
    }

    fn gc(&self, max_lifetime: Duration) -> usize {
        let mut sessions = self.sessions.lock();
        let now = Utc::now();
        let mut removed = 0;

        loop {
            let expired = match sessions.peek_lru() {
                Some((_, store)) => is_expired(store.last_accessed(), now, max_lifetime),
                None => break,
            };
            if !expired {
                break;
            }
            sessions.pop_lru();
            removed += 1;
        }

        if removed > 0 {
            debug!(
                removed = removed,
                remaining = sessions.len(),
                "Collected expired sessions"
            );
        }

        removed
    }

    fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}

/// Idle for strictly longer than `max_lifetime`. Clock skew that puts
/// `last_accessed` in the future counts as live.
fn is_expired(last_accessed: DateTime<Utc>, now: DateTime<Utc>, max_lifetime: Duration) -> bool {
    (now - last_accessed)
        .to_std()
        .is_ok_and(|idle| idle > max_lifetime)
}
