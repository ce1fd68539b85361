/// Session lifecycle
///
/// A session ties an opaque client token to a user ID for a bounded time.
/// Sessions are created on signup and login, read by the auth gate on every
/// protected request, and deleted on logout. Expiry is passive: the store
/// drops the record once its TTL elapses.
///
/// # Modules
///
/// - [`token`]: token generation and the token-to-ID digest
/// - [`store`]: the [`store::SessionStore`] contract and its Redis backend
/// - [`memory`]: in-memory backend for tests and local runs
/// - [`service`]: [`service::SessionService`], the only entry point handlers use
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
///
/// let token = sessions.create_session(42, 3600).await?;
/// let session = sessions.get_session_by_id(&token).await?;
/// assert_eq!(session.user_id, 42);
///
/// sessions.delete_by_id(&token).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

pub mod memory;
pub mod service;
pub mod store;
pub mod token;

/// Stored session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Digest of the client token (see [`token::session_id_for`])
    pub session_id: String,

    /// Owning user
    pub user_id: i32,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Session service errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// No live session for the token (unknown, malformed or expired)
    #[error("Session not found")]
    NotFound,

    /// A session must live for at least one second
    #[error("Session TTL must be greater than zero")]
    InvalidTtl,

    /// Session store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
