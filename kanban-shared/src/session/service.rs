/// Session service
///
/// Creates, resolves and deletes sessions on top of an injected
/// [`SessionStore`]. Clients only ever see the token; the store only ever
/// sees its digest.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use kanban_shared::session::memory::MemorySessionStore;
/// use kanban_shared::session::service::SessionService;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sessions = SessionService::new(Arc::new(MemorySessionStore::new()));
/// let token = sessions.create_session(1, 3600).await?;
/// assert_eq!(token.len(), 64);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::store::SessionStore;
use super::token::{generate_token, is_well_formed, session_id_for};
use super::{Session, SessionError};

/// Session lifecycle operations
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Starts a session for `user_id` and returns its token
    ///
    /// # Errors
    ///
    /// - `InvalidTtl` if `ttl_seconds` is zero
    /// - `Store` if the session could not be written
    pub async fn create_session(
        &self,
        user_id: i32,
        ttl_seconds: u64,
    ) -> Result<String, SessionError> {
        if ttl_seconds == 0 {
            return Err(SessionError::InvalidTtl);
        }

        let token = generate_token();
        let session = Session {
            session_id: session_id_for(&token),
            user_id,
            created_at: Utc::now(),
        };

        self.store
            .put(&session, Duration::from_secs(ttl_seconds))
            .await?;

        tracing::debug!(user_id, "Session created");

        Ok(token)
    }

    /// Resolves a token to its live session
    ///
    /// Unknown, malformed and expired tokens are all `NotFound`.
    pub async fn get_session_by_id(&self, token: &str) -> Result<Session, SessionError> {
        if !is_well_formed(token) {
            return Err(SessionError::NotFound);
        }

        self.store
            .get(&session_id_for(token))
            .await?
            .ok_or(SessionError::NotFound)
    }

    /// Ends the session named by `token`; ending an absent session is a no-op
    pub async fn delete_by_id(&self, token: &str) -> Result<(), SessionError> {
        if !is_well_formed(token) {
            return Ok(());
        }

        self.store.delete(&session_id_for(token)).await?;
        Ok(())
    }

    /// Closes the underlying store
    pub async fn close(&self) -> Result<(), SessionError> {
        self.store.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::memory::MemorySessionStore;

    fn service() -> SessionService {
        SessionService::new(Arc::new(MemorySessionStore::new()))
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let sessions = service();
        let token = sessions.create_session(5, 60).await.unwrap();

        let session = sessions.get_session_by_id(&token).await.unwrap();
        assert_eq!(session.user_id, 5);
        assert_eq!(session.session_id, session_id_for(&token));
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected() {
        let result = service().create_session(5, 0).await;
        assert!(matches!(result, Err(SessionError::InvalidTtl)));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_tokens_not_found() {
        let sessions = service();

        let unknown = generate_token();
        assert!(matches!(
            sessions.get_session_by_id(&unknown).await,
            Err(SessionError::NotFound)
        ));
        assert!(matches!(
            sessions.get_session_by_id("not-a-token").await,
            Err(SessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let sessions = service();
        let token = sessions.create_session(5, 60).await.unwrap();

        sessions.delete_by_id(&token).await.unwrap();
        sessions.delete_by_id(&token).await.unwrap();
        sessions.delete_by_id("garbage").await.unwrap();

        assert!(matches!(
            sessions.get_session_by_id(&token).await,
            Err(SessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_sessions_per_user() {
        let sessions = service();
        let first = sessions.create_session(5, 60).await.unwrap();
        let second = sessions.create_session(5, 60).await.unwrap();

        assert_ne!(first, second);

        sessions.delete_by_id(&first).await.unwrap();
        assert_eq!(sessions.get_session_by_id(&second).await.unwrap().user_id, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires() {
        let sessions = service();
        let token = sessions.create_session(5, 30).await.unwrap();

        tokio::time::advance(Duration::from_secs(31)).await;

        assert!(matches!(
            sessions.get_session_by_id(&token).await,
            Err(SessionError::NotFound)
        ));
    }
}
