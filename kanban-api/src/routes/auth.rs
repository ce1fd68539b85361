/// Authentication endpoints
///
/// - `POST /auth/signup` - Register and start a session
/// - `POST /auth/login` - Start a session
/// - `POST /auth/logout` - End the current session (requires the session cookie)
///
/// Signup and login answer with the user (never the password hash) and a
/// `Set-Cookie` header carrying the session token. Logout deletes the
/// session and clears the cookie.

use crate::{
    app::AppState,
    cookies::{clear_session_cookie, session_cookie, set_cookie},
    error::ApiResult,
    extract::ValidatedJson,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use kanban_shared::{auth::middleware::AuthContext, models::user::PublicUser};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup and login body
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    /// Email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 60, message = "Email must be at most 60 characters")
    )]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/signup
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret1" }
/// ```
///
/// # Response
///
/// ```text
/// 201 Created
/// Set-Cookie: session-id=<token>; Path=/; Max-Age=3600; HttpOnly; SameSite=Lax
///
/// { "id": 1, "email": "user@example.com" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    let user: PublicUser = state.auth.register(&req.email, &req.password).await?;

    let token = state
        .sessions
        .create_session(user.id, state.config.session.expire_secs)
        .await?;

    Ok((
        StatusCode::CREATED,
        set_cookie(session_cookie(&state.config, &token))?,
        Json(user),
    ))
}

/// Log in with email and password
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `401 Unauthorized`: Unknown email or wrong password (same body for both)
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.auth.login(&req.email, &req.password).await?;

    let token = state
        .sessions
        .create_session(user.id, state.config.session.expire_secs)
        .await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        StatusCode::OK,
        set_cookie(session_cookie(&state.config, &token))?,
        Json(user),
    ))
}

/// End the current session
///
/// # Endpoint
///
/// ```text
/// POST /auth/logout
/// Cookie: session-id=<token>
/// ```
///
/// The token stops working immediately; the response clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<impl IntoResponse> {
    state.sessions.delete_by_id(&auth.session_token).await?;

    tracing::info!(user_id = auth.user.id, "User logged out");

    Ok((
        StatusCode::OK,
        set_cookie(clear_session_cookie(&state.config))?,
        Json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
    ))
}
