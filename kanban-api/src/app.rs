/// Application state and router builder
///
/// [`AppState`] holds the services every handler needs. Storage is picked
/// once, through [`Backends`]: PostgreSQL + Redis in production, in-memory
/// stores for tests and for running without infrastructure.
///
/// # Example
///
/// ```no_run
/// use kanban_api::app::{build_router, AppState, Backends};
/// use kanban_api::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// let state = AppState::new(config, Backends::in_memory());
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        deadline::request_deadline, debug_errors::debug_errors, security::SecurityHeadersLayer,
        session::require_session,
    },
    routes,
};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use kanban_shared::{
    auth::{middleware::AuthGate, service::AuthService},
    redis::RedisClient,
    session::{
        memory::MemorySessionStore,
        service::SessionService,
        store::{RedisSessionStore, SessionStore},
    },
    store::{
        memory::{MemoryCredentialStore, MemoryKanbanStore},
        postgres::{PgCredentialStore, PgKanbanStore},
        CredentialStore, KanbanStore,
    },
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Storage backends, chosen at startup
pub struct Backends {
    pub credentials: Arc<dyn CredentialStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub kanban: Arc<dyn KanbanStore>,

    /// Pool behind the PostgreSQL stores, for health checks
    pub db: Option<PgPool>,

    /// Client behind the Redis session store, for health checks
    pub redis: Option<RedisClient>,
}

impl Backends {
    /// Everything in process memory
    pub fn in_memory() -> Self {
        Self {
            credentials: Arc::new(MemoryCredentialStore::new()),
            sessions: Arc::new(MemorySessionStore::new()),
            kanban: Arc::new(MemoryKanbanStore::new()),
            db: None,
            redis: None,
        }
    }

    /// Users and boards in PostgreSQL, sessions in Redis under `session_prefix`
    pub fn postgres_redis(pool: PgPool, redis: RedisClient, session_prefix: &str) -> Self {
        Self {
            credentials: Arc::new(PgCredentialStore::new(pool.clone())),
            sessions: Arc::new(RedisSessionStore::new(redis.clone(), session_prefix)),
            kanban: Arc::new(PgKanbanStore::new(pool.clone())),
            db: Some(pool),
            redis: Some(redis),
        }
    }
}

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every
/// field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    pub auth: AuthService,

    pub sessions: SessionService,

    pub kanban: Arc<dyn KanbanStore>,

    pub gate: AuthGate,

    pub db: Option<PgPool>,

    pub redis: Option<RedisClient>,
}

impl AppState {
    pub fn new(config: Config, backends: Backends) -> Self {
        let auth = AuthService::new(backends.credentials);
        let sessions = SessionService::new(backends.sessions);
        let gate = AuthGate::new(sessions.clone(), auth.clone(), config.session.name.clone());

        Self {
            config: Arc::new(config),
            auth,
            sessions,
            kanban: backends.kanban,
            gate,
            db: backends.db,
            redis: backends.redis,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET    /health                        (public)
/// ├── /auth/
/// │   ├── POST /signup                      (public)
/// │   ├── POST /login                       (public)
/// │   └── POST /logout                      (session)
/// ├── /columns/                             (session)
/// │   ├── POST   /create
/// │   ├── DELETE /:id
/// │   └── PATCH  /:id/update_name
/// ├── /tasks/                               (session)
/// │   ├── POST   /create
/// │   ├── DELETE /:id
/// │   ├── PATCH  /:id/update_description
/// │   └── PATCH  /:id/update_column_id
/// └── GET /boards/:user_id                  (session)
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Request ID (`x-request-id`, generated when absent, echoed back)
/// 2. Tracing (tower-http TraceLayer)
/// 3. Security headers, CORS
/// 4. Debug error bodies (when enabled)
/// 5. Request deadline (`503 service_unavailable` once exceeded)
/// 6. Session gate (protected routes only)
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login));

    let protected_routes = Router::new()
        .route("/auth/logout", post(routes::auth::logout))
        .route("/columns/create", post(routes::columns::create_column))
        .route("/columns/:id", delete(routes::columns::delete_column))
        .route("/columns/:id/update_name", patch(routes::columns::update_name))
        .route("/tasks/create", post(routes::tasks::create_task))
        .route("/tasks/:id", delete(routes::tasks::delete_task))
        .route(
            "/tasks/:id/update_description",
            patch(routes::tasks::update_description),
        )
        .route(
            "/tasks/:id/update_column_id",
            patch(routes::tasks::update_column_id),
        )
        .route("/boards/:user_id", get(routes::boards::get_board))
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            require_session,
        ));

    let request_id = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(
            Duration::from_secs(config.http.request_timeout_secs),
            request_deadline,
        ))
        .layer(middleware::from_fn_with_state(
            config.http.debug_errors_response,
            debug_errors,
        ))
        .layer(cors_layer(&config))
        .layer(SecurityHeadersLayer::new(config.http.production))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

/// CORS: any origin for `*`, otherwise the configured list with credentials
fn cors_layer(config: &Config) -> CorsLayer {
    if config.http.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .http
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
