/// Column endpoints (session required)
///
/// - `POST /columns/create` - Add a column to the caller's board
/// - `DELETE /columns/:id` - Delete a column and its tasks
/// - `PATCH /columns/:id/update_name` - Rename a column
///
/// Only the caller's own board is reachable: a column on another board is
/// reported as `404`, same as one that does not exist.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{PathId, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use kanban_shared::{
    auth::middleware::AuthContext,
    models::column::{Column, CreateColumn},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create column body
#[derive(Debug, Deserialize, Validate)]
pub struct CreateColumnRequest {
    /// Board owner; must be the caller
    pub user_id: i32,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Rename column body
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateColumnNameRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Body of successful deletes
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    /// ID of the deleted row
    pub id: i32,
}

pub(crate) fn column_not_found(id: i32) -> ApiError {
    ApiError::NotFound(format!("Column {} not found", id))
}

/// `POST /columns/create` → `201` + Column
pub async fn create_column(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    if req.user_id != auth.user.id {
        return Err(ApiError::NotFound(format!(
            "Board of user {} not found",
            req.user_id
        )));
    }

    let column = state
        .kanban
        .create_column(CreateColumn {
            user_id: req.user_id,
            name: req.name,
        })
        .await?;

    tracing::info!(user_id = auth.user.id, column_id = column.id, "Column created");

    Ok((StatusCode::CREATED, Json(column)))
}

/// `DELETE /columns/:id` → `200`, or `404` when no row was deleted
pub async fn delete_column(
    State(state): State<AppState>,
    auth: AuthContext,
    PathId(id): PathId,
) -> ApiResult<Json<DeletedResponse>> {
    if !state.kanban.delete_column(auth.user.id, id).await? {
        return Err(column_not_found(id));
    }

    tracing::info!(user_id = auth.user.id, column_id = id, "Column deleted");

    Ok(Json(DeletedResponse { id }))
}

/// `PATCH /columns/:id/update_name` → `200` + Column
pub async fn update_name(
    State(state): State<AppState>,
    auth: AuthContext,
    PathId(id): PathId,
    ValidatedJson(req): ValidatedJson<UpdateColumnNameRequest>,
) -> ApiResult<Json<Column>> {
    state
        .kanban
        .rename_column(auth.user.id, id, &req.name)
        .await?
        .map(Json)
        .ok_or_else(|| column_not_found(id))
}
