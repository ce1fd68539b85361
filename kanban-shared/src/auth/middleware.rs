/// Auth gate for session-protected routes
///
/// Every protected request walks the same steps, stopping at the first
/// failure:
///
/// ```text
/// NoToken -> TokenPresent -> SessionResolved -> UserResolved -> Authenticated
///    |            |                 |                 |
///    +------------+-----------------+-----------------+----> Rejected (401)
/// ```
///
/// 1. Read the session token from the configured cookie
/// 2. Resolve the session ([`SessionService::get_session_by_id`])
/// 3. Resolve its user ([`AuthService::get_by_id`])
/// 4. Hand the handler an [`AuthContext`]
///
/// Callers only ever see "unauthorized": an expired session, a forged token
/// and a session whose user is gone all look the same from outside.
///
/// # Request Context
///
/// The HTTP layer runs [`AuthGate::authenticate`] and inserts the resulting
/// [`AuthContext`] into the request extensions. Handlers take it as a typed
/// extractor:
///
/// ```no_run
/// use kanban_shared::auth::middleware::AuthContext;
///
/// async fn whoami(auth: AuthContext) -> String {
///     format!("user {}", auth.user.id)
/// }
/// ```

use std::net::SocketAddr;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::service::{AuthService, AuthServiceError};
use crate::models::user::PublicUser;
use crate::session::service::SessionService;
use crate::session::SessionError;
use crate::store::StoreError;

/// Header carrying the per-request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Authenticated caller, available to handlers behind the gate
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user
    pub user: PublicUser,

    /// Raw session token the request presented
    pub session_token: String,
}

/// Why the gate rejected a request
#[derive(Debug, thiserror::Error)]
pub enum AuthGateError {
    /// No session cookie on the request
    #[error("Missing session cookie")]
    MissingToken,

    /// Token does not name a live session
    #[error("Invalid or expired session")]
    InvalidSession,

    /// Session outlived its user
    #[error("Session user no longer exists")]
    UnknownUser,

    /// Session or credential store failed
    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Authentication failed: {0}")]
    Internal(String),
}

impl From<SessionError> for AuthGateError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound => AuthGateError::InvalidSession,
            SessionError::Store(e) => AuthGateError::Storage(e),
            other => AuthGateError::Internal(other.to_string()),
        }
    }
}

impl From<AuthServiceError> for AuthGateError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::NotFound => AuthGateError::UnknownUser,
            AuthServiceError::Store(e) => AuthGateError::Storage(e),
            other => AuthGateError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AuthGateError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AuthGateError::Storage(StoreError::Timeout) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
            }
            AuthGateError::Storage(_) | AuthGateError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            _ => (StatusCode::UNAUTHORIZED, "unauthorized"),
        };

        let message = if status == StatusCode::UNAUTHORIZED {
            "Unauthorized"
        } else {
            "Authentication unavailable"
        };

        (status, Json(json!({ "error": error, "message": message }))).into_response()
    }
}

/// Resolves session cookies to authenticated users
#[derive(Clone)]
pub struct AuthGate {
    sessions: SessionService,
    auth: AuthService,
    cookie_name: String,
}

impl AuthGate {
    pub fn new(sessions: SessionService, auth: AuthService, cookie_name: impl Into<String>) -> Self {
        Self {
            sessions,
            auth,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Runs the gate against request headers
    ///
    /// `peer` is the TCP peer address when the server exposes it.
    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
        peer: Option<SocketAddr>,
    ) -> Result<AuthContext, AuthGateError> {
        let token =
            read_cookie(headers, &self.cookie_name).ok_or(AuthGateError::MissingToken)?;

        let session = self.sessions.get_session_by_id(&token).await?;
        let user = self.auth.get_by_id(session.user_id).await?;

        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        let ip = peer
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        // TODO: redact session_token once log shipping leaves the host
        tracing::info!(
            request_id,
            ip = %ip,
            user_id = user.id,
            session_token = %token,
            "Request authenticated"
        );

        Ok(AuthContext {
            user,
            session_token: token,
        })
    }
}

/// Finds a cookie value by name across all `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthGateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthGateError::MissingToken)
    }
}
