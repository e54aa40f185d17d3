//! In-memory session store.
//!
//! Sessions live in an LRU table bounded by capacity. Sessions idle longer
//! than the configured timeout are dropped lazily: on lookup, and in a sweep
//! whenever a session is inserted. Each session sits behind its own mutex so
//! turns on the same session serialize while other sessions proceed.

use aidkit_core::config::SessionConfig;
use aidkit_core::session::{Session, SessionHandle, SessionStore};
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct Slot {
    handle: SessionHandle,
    last_seen: Instant,
}

pub struct MemorySessionStore {
    table: Mutex<LruCache<String, Slot>>,
    /// `None` disables idle expiry
    idle_timeout: Option<Duration>,
}

impl MemorySessionStore {
    pub fn new(capacity: usize, idle_timeout: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            table: Mutex::new(LruCache::new(capacity)),
            idle_timeout,
        }
    }

    /// Builds a store from configuration; an idle timeout of 0 disables expiry.
    pub fn from_config(config: &SessionConfig) -> Self {
        let idle_timeout =
            (config.idle_timeout_secs > 0).then(|| Duration::from_secs(config.idle_timeout_secs));
        Self::new(config.capacity, idle_timeout)
    }

    fn is_expired(&self, slot: &Slot, now: Instant) -> bool {
        self.idle_timeout
            .is_some_and(|timeout| now.duration_since(slot.last_seen) >= timeout)
    }

    /// Pops expired sessions from the least recently used end.
    ///
    /// LRU order matches `last_seen` order, so the sweep stops at the first live session.
    fn reap_idle(&self, table: &mut LruCache<String, Slot>, now: Instant) -> usize {
        let mut reaped = 0;
        while let Some((_, slot)) = table.peek_lru() {
            if !self.is_expired(slot, now) {
                break;
            }
            table.pop_lru();
            reaped += 1;
        }
        reaped
    }

    async fn insert(&self, session: Session) -> SessionHandle {
        let id = session.id.clone();
        let handle = Arc::new(Mutex::new(session));
        let now = Instant::now();

        let mut table = self.table.lock().await;
        let reaped = self.reap_idle(&mut table, now);
        if reaped > 0 {
            tracing::debug!(reaped, "Reaped idle sessions");
        }

        let slot = Slot {
            handle: handle.clone(),
            last_seen: now,
        };
        if let Some((evicted, _)) = table.push(id.clone(), slot)
            && evicted != id
        {
            tracing::info!(session_id = %evicted, "Evicted least recently used session");
        }

        handle
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, lang: &str) -> SessionHandle {
        let session = Session::new(lang);
        tracing::info!(session_id = %session.id, lang, "Session created");
        self.insert(session).await
    }

    async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        let now = Instant::now();
        let mut table = self.table.lock().await;

        let slot = table.get_mut(session_id)?;
        if !self.is_expired(slot, now) {
            slot.last_seen = now;
            return Some(slot.handle.clone());
        }

        table.pop(session_id);
        tracing::debug!(session_id, "Session expired");
        None
    }

    async fn upsert(&self, session: Session) -> SessionHandle {
        self.insert(session).await
    }

    async fn len(&self) -> usize {
        self.table.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemorySessionStore::new(10, None);
        let handle = store.create("ti").await;
        let id = handle.lock().await.id.clone();

        let found = store.get(&id).await.unwrap();
        assert!(Arc::ptr_eq(&handle, &found));
        assert_eq!(found.lock().await.lang, "ti");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let store = MemorySessionStore::new(10, None);
        assert!(store.get("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let store = MemorySessionStore::new(10, None);
        let mut session = Session::with_id("fixed", "en");
        store.upsert(session.clone()).await;

        session.lang = "am".to_string();
        store.upsert(session).await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("fixed").await.unwrap().lock().await.lang, "am");
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let store = MemorySessionStore::new(2, None);
        store.upsert(Session::with_id("a", "en")).await;
        store.upsert(Session::with_id("b", "en")).await;

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(store.get("a").await.is_some());
        store.upsert(Session::with_id("c", "en")).await;

        assert_eq!(store.len().await, 2);
        assert!(store.get("a").await.is_some());
        assert!(store.get("b").await.is_none());
        assert!(store.get("c").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire_on_lookup() {
        let store = MemorySessionStore::new(10, Some(Duration::from_secs(60)));
        store.upsert(Session::with_id("a", "en")).await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(store.get("a").await.is_some());

        // The lookup refreshed the idle clock.
        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(store.get("a").await.is_some());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(store.get("a").await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_sweeps_idle_sessions() {
        let store = MemorySessionStore::new(10, Some(Duration::from_secs(60)));
        store.upsert(Session::with_id("old", "en")).await;
        tokio::time::advance(Duration::from_secs(50)).await;
        store.upsert(Session::with_id("recent", "en")).await;

        tokio::time::advance(Duration::from_secs(20)).await;
        store.create("en").await;

        assert_eq!(store.len().await, 2);
        assert!(store.get("recent").await.is_some());
        assert!(store.get("old").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_mints_for_missing_or_unknown_ids() {
        let store = MemorySessionStore::new(10, None);

        let (handle, created) = store.resolve(None, "en").await;
        assert!(created);
        let id = handle.lock().await.id.clone();

        let (again, created) = store.resolve(Some(&id), "en").await;
        assert!(!created);
        assert!(Arc::ptr_eq(&handle, &again));

        let (other, created) = store.resolve(Some("stale-id"), "en").await;
        assert!(created);
        assert_ne!(other.lock().await.id, "stale-id");

        let (_, created) = store.resolve(Some(""), "en").await;
        assert!(created);
        assert_eq!(store.len().await, 3);
    }

    #[test]
    fn test_zero_timeout_disables_expiry() {
        let store = MemorySessionStore::from_config(&SessionConfig {
            capacity: 0,
            idle_timeout_secs: 0,
        });
        assert!(store.idle_timeout.is_none());
    }
}
