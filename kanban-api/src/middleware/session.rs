/// Session gate middleware
///
/// Runs [`AuthGate::authenticate`] for every request on a protected router
/// and stores the resulting [`AuthContext`] in the request extensions,
/// where handlers pick it up as an extractor. Any rejection ends the
/// request with `401 unauthorized`.
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use kanban_api::middleware::session::require_session;
/// use kanban_shared::auth::middleware::{AuthContext, AuthGate};
///
/// async fn whoami(auth: AuthContext) -> String {
///     auth.user.email
/// }
///
/// fn protected(gate: AuthGate) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .layer(middleware::from_fn_with_state(gate, require_session))
/// }
/// ```

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use kanban_shared::auth::middleware::{AuthContext, AuthGate};

use crate::error::ApiError;

/// Rejects requests without a live session
pub async fn require_session(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let context: AuthContext = gate.authenticate(req.headers(), peer).await?;
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}
