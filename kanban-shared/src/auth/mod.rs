/// Authentication
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and constant-time verification
/// - [`service`]: registration, login and user lookup
/// - [`middleware`]: the auth gate and the [`middleware::AuthContext`] extractor
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use kanban_shared::auth::middleware::AuthGate;
/// use kanban_shared::auth::service::AuthService;
/// use kanban_shared::session::memory::MemorySessionStore;
/// use kanban_shared::session::service::SessionService;
/// use kanban_shared::store::memory::MemoryCredentialStore;
///
/// let auth = AuthService::new(Arc::new(MemoryCredentialStore::new()));
/// let sessions = SessionService::new(Arc::new(MemorySessionStore::new()));
/// let gate = AuthGate::new(sessions, auth, "session-id");
/// ```

pub mod middleware;
pub mod password;
pub mod service;
