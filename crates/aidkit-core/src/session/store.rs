//! Session store trait.

use super::model::Session;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared, lockable handle to one session.
///
/// Holding the lock for a whole conversational turn serializes concurrent
/// requests that carry the same session id.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Process-wide table of live sessions.
///
/// The store exclusively owns session records; callers re-fetch by id on every
/// interaction instead of keeping handles across requests.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates and registers a new idle session.
    async fn create(&self, lang: &str) -> SessionHandle;

    /// Finds a live session by id.
    async fn get(&self, session_id: &str) -> Option<SessionHandle>;

    /// Inserts a session, replacing any session with the same id.
    async fn upsert(&self, session: Session) -> SessionHandle;

    /// Number of live sessions.
    async fn len(&self) -> usize;

    /// Returns the session for `session_id`, minting a new one when the id is
    /// missing or unknown. The flag reports whether a session was created.
    async fn resolve(&self, session_id: Option<&str>, lang: &str) -> (SessionHandle, bool) {
        if let Some(id) = session_id.filter(|id| !id.is_empty())
            && let Some(handle) = self.get(id).await
        {
            return (handle, false);
        }
        (self.create(lang).await, true)
    }
}
