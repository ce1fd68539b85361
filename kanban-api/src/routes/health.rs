/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "redis": "connected"
/// }
/// ```
///
/// A backend that is not configured (in-memory mode) reports `"memory"`.
/// `status` is `degraded` when any configured backend is unreachable.

use crate::app::AppState;
use axum::{extract::State, Json};
use kanban_shared::db::pool::health_check as db_health_check;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Redis status
    pub redis: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.db {
        Some(pool) => match db_health_check(pool).await {
            Ok(()) => "connected",
            Err(e) => {
                tracing::warn!("Database health check failed: {}", e);
                "disconnected"
            }
        },
        None => "memory",
    };

    let redis = match &state.redis {
        Some(client) => match client.ping().await {
            Ok(true) => "connected",
            Ok(false) => "disconnected",
            Err(e) => {
                tracing::warn!("Redis health check failed: {}", e);
                "disconnected"
            }
        },
        None => "memory",
    };

    let status = if database == "disconnected" || redis == "disconnected" {
        "degraded"
    } else {
        "healthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        redis: redis.to_string(),
    })
}
