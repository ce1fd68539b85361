/// In-memory session store
///
/// Expiry is passive, same as Redis: an expired entry is dropped when it is
/// next read. Deadlines use `tokio::time::Instant`, so tests can pause and
/// advance the clock.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::store::SessionStore;
use super::Session;
use crate::store::StoreError;

struct Entry {
    session: Session,
    expires_at: Instant,
}

/// Session store kept in process memory
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until read
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, session: &Session, ttl: Duration) -> Result<(), StoreError> {
        let entry = Entry {
            session: session.clone(),
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .write()
            .await
            .insert(session.session_id.clone(), entry);

        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        let mut entries = self.entries.write().await;

        match entries.get(session_id) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.session.clone())),
            Some(_) => {
                entries.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, session_id: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(session_id);
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(id: &str, user_id: i32) -> Session {
        Session {
            session_id: id.to_string(),
            user_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemorySessionStore::new();
        let s = session("a", 1);

        store.put(&s, Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(s));

        store.delete("a").await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_absent_is_ok() {
        let store = MemorySessionStore::new();
        assert!(store.delete("missing").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let store = MemorySessionStore::new();
        store.put(&session("a", 1), Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(store.get("a").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.get("a").await.unwrap().is_none());

        // Dropped on read
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_close_clears_entries() {
        let store = MemorySessionStore::new();
        store.put(&session("a", 1), Duration::from_secs(60)).await.unwrap();

        store.close().await.unwrap();
        assert!(store.is_empty().await);
    }
}
