/// Auth service: registration, login and user lookup
///
/// Talks to the [`CredentialStore`] only. Plaintext passwords are hashed
/// before anything is stored and are never logged.
///
/// # Duplicate emails
///
/// `register` checks for an existing email first, but the store's unique
/// constraint is what actually decides: two concurrent signups for the same
/// email can both pass the check, and the loser gets `Conflict` from the
/// constraint violation.
///
/// # Login failures
///
/// A wrong password and an unknown email both produce
/// `InvalidCredentials`. For an unknown email a dummy hash is still
/// verified so both paths spend the same Argon2 work.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use kanban_shared::auth::service::AuthService;
/// use kanban_shared::store::memory::MemoryCredentialStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let auth = AuthService::new(Arc::new(MemoryCredentialStore::new()));
///
/// let user = auth.register("user@example.com", "secret1").await?;
/// let same = auth.login("user@example.com", "secret1").await?;
/// assert_eq!(user.id, same.id);
/// # Ok(())
/// # }
/// ```

use std::sync::{Arc, OnceLock};

use thiserror::Error;

use super::password::{hash_password, verify_password, PasswordError};
use crate::models::user::{CreateUser, PublicUser};
use crate::store::{CredentialStore, StoreError};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthServiceError {
    /// Email already registered
    #[error("User with email {0} already exists")]
    Conflict(String),

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No user with the requested ID
    #[error("User not found")]
    NotFound,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Registration, login and user lookup
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
}

impl AuthService {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// - `Conflict` if the email is taken
    /// - `Password` if hashing fails
    /// - `Store` on storage failure
    pub async fn register(&self, email: &str, password: &str) -> Result<PublicUser, AuthServiceError> {
        if self.credentials.find_by_email(email).await?.is_some() {
            return Err(AuthServiceError::Conflict(email.to_string()));
        }

        let password_hash = hash_password(password)?;

        let user = self
            .credentials
            .insert(CreateUser {
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => AuthServiceError::Conflict(email.to_string()),
                other => AuthServiceError::Store(other),
            })?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(user.sanitize())
    }

    /// Checks an email/password pair
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` for an unknown email or a wrong password
    /// - `Store` on storage failure
    pub async fn login(&self, email: &str, password: &str) -> Result<PublicUser, AuthServiceError> {
        let Some(user) = self.credentials.find_by_email(email).await? else {
            // Burn the same hashing work as a real verification
            let _ = verify_password(password, dummy_hash()?);
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(user.sanitize())
    }

    /// Loads a user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<PublicUser, AuthServiceError> {
        self.credentials
            .find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or(AuthServiceError::NotFound)
    }
}

fn dummy_hash() -> Result<&'static str, PasswordError> {
    static DUMMY: OnceLock<String> = OnceLock::new();

    if let Some(hash) = DUMMY.get() {
        return Ok(hash);
    }
    let hash = hash_password("dummy-password-for-timing")?;
    Ok(DUMMY.get_or_init(|| hash))
}
