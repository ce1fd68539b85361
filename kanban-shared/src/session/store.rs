/// Session store contract and the Redis backend
///
/// # Redis Layout
///
/// ```text
/// {prefix}:{session_id}  ->  JSON Session      (SET .. EX ttl)
/// ```
///
/// Redis expires keys on its own, so a read after the TTL simply misses.

use std::time::Duration;

use async_trait::async_trait;

use super::Session;
use crate::redis::RedisClient;
use crate::store::StoreError;

/// Ephemeral session persistence with TTL-based expiry
///
/// Opened at startup, handed to the [`super::service::SessionService`] and
/// closed on shutdown. Nothing else holds a reference to it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `session` under its ID; it vanishes after `ttl`
    async fn put(&self, session: &Session, ttl: Duration) -> Result<(), StoreError>;

    /// Loads a live session
    async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError>;

    /// Removes a session; removing an absent one is not an error
    async fn delete(&self, session_id: &str) -> Result<(), StoreError>;

    /// Releases backend resources
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Redis-backed session store
#[derive(Clone)]
pub struct RedisSessionStore {
    client: RedisClient,
    prefix: String,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    fn key(&self, session_id: &str) -> String {
        session_key(&self.prefix, session_id)
    }
}

fn session_key(prefix: &str, session_id: &str) -> String {
    format!("{}:{}", prefix, session_id)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, session: &Session, ttl: Duration) -> Result<(), StoreError> {
        let payload = serde_json::to_string(session)?;
        let mut conn = self.client.get_connection();

        self.client
            .run(
                redis::cmd("SET")
                    .arg(self.key(&session.session_id))
                    .arg(payload)
                    .arg("EX")
                    .arg(ttl.as_secs())
                    .query_async::<_, ()>(&mut conn),
            )
            .await?;

        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        let mut conn = self.client.get_connection();

        let payload: Option<String> = self
            .client
            .run(
                redis::cmd("GET")
                    .arg(self.key(session_id))
                    .query_async(&mut conn),
            )
            .await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, session_id: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_connection();

        self.client
            .run(
                redis::cmd("DEL")
                    .arg(self.key(session_id))
                    .query_async::<_, ()>(&mut conn),
            )
            .await?;

        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        // The connection manager closes its socket when the last clone drops.
        tracing::info!("Closing Redis session store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redis::RedisConfig;
    use crate::session::token::{generate_token, session_id_for};
    use chrono::Utc;

    #[test]
    fn test_session_key_format() {
        assert_eq!(session_key("api-session", "abc"), "api-session:abc");
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_redis_session_roundtrip() {
        let client = RedisClient::new(RedisConfig::default()).await.unwrap();
        let store = RedisSessionStore::new(client, "test-session");

        let session = Session {
            session_id: session_id_for(&generate_token()),
            user_id: 7,
            created_at: Utc::now(),
        };

        store.put(&session, Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get(&session.session_id).await.unwrap(), Some(session.clone()));

        store.delete(&session.session_id).await.unwrap();
        assert!(store.get(&session.session_id).await.unwrap().is_none());

        // Deleting twice is fine
        store.delete(&session.session_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_redis_session_expires() {
        let client = RedisClient::new(RedisConfig::default()).await.unwrap();
        let store = RedisSessionStore::new(client, "test-session");

        let session = Session {
            session_id: session_id_for(&generate_token()),
            user_id: 7,
            created_at: Utc::now(),
        };

        store.put(&session, Duration::from_secs(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(store.get(&session.session_id).await.unwrap().is_none());
    }
}
