//! # Kanban API Server
//!
//! Session-authenticated REST backend for a kanban board.
//!
//! ## Startup
//!
//! 1. Tracing (`RUST_LOG`, `LOG_FORMAT=json` for JSON lines)
//! 2. Configuration (see [`kanban_api::config`])
//! 3. PostgreSQL pool with startup retry, then migrations
//! 4. Redis connection for the session store
//! 5. HTTP server until Ctrl-C / SIGTERM, then drain and close stores
//!
//! With `KANBAN__BACKEND=memory` steps 3 and 4 are skipped.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/kanban REDIS_URL=redis://localhost cargo run -p kanban-api
//! ```

use std::net::SocketAddr;

use anyhow::Context;
use kanban_api::{
    app::{build_router, AppState, Backends},
    config::{Backend, Config},
};
use kanban_shared::{
    db::{migrations::run_migrations, pool},
    redis::RedisClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Kanban API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load().context("Failed to load configuration")?;

    let backends = match config.backend {
        Backend::Postgres => {
            let pool = pool::create_pool_with_retry(&config.database)
                .await
                .context("Failed to connect to PostgreSQL")?;
            run_migrations(&pool).await.context("Failed to run migrations")?;

            let redis = RedisClient::new(config.redis.clone())
                .await
                .context("Failed to connect to Redis")?;

            Backends::postgres_redis(pool, redis, &config.session.prefix)
        }
        Backend::Memory => {
            tracing::warn!("Running with in-memory storage; all data is lost on exit");
            Backends::in_memory()
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::new(config, backends);
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, closing stores");

    if let Err(e) = state.sessions.close().await {
        tracing::warn!("Failed to close session store: {}", e);
    }
    if let Some(db) = state.db.clone() {
        pool::close_pool(db).await;
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kanban_api=debug,kanban_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
