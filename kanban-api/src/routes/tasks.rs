/// Task endpoints (session required)
///
/// - `POST /tasks/create` - Add a task to a column
/// - `DELETE /tasks/:id` - Delete a task
/// - `PATCH /tasks/:id/update_description` - Change a task's text
/// - `PATCH /tasks/:id/update_column_id` - Move a task to another column
///
/// Tasks and columns on another user's board are reported as `404`.
/// Naming a column that does not exist at all is a `400`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{PathId, ValidatedJson},
    routes::columns::{column_not_found, DeletedResponse},
};
use axum::{extract::State, http::StatusCode, Json};
use kanban_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task},
};
use serde::Deserialize;
use validator::Validate;

/// Create task body
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    pub column_id: i32,

    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: String,
}

/// Update description body
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDescriptionRequest {
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: String,
}

/// Move task body
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateColumnIdRequest {
    pub column_id: i32,
}

fn task_not_found(id: i32) -> ApiError {
    ApiError::NotFound(format!("Task {} not found", id))
}

/// `POST /tasks/create` → `201` + Task
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let column_id = req.column_id;
    let task = state
        .kanban
        .create_task(
            auth.user.id,
            CreateTask {
                column_id,
                description: req.description,
            },
        )
        .await?
        .ok_or_else(|| column_not_found(column_id))?;

    tracing::info!(
        user_id = auth.user.id,
        task_id = task.id,
        column_id = task.column_id,
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// `DELETE /tasks/:id` → `200`, or `404` when no row was deleted
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    PathId(id): PathId,
) -> ApiResult<Json<DeletedResponse>> {
    if !state.kanban.delete_task(auth.user.id, id).await? {
        return Err(task_not_found(id));
    }

    Ok(Json(DeletedResponse { id }))
}

/// `PATCH /tasks/:id/update_description` → `200` + Task
pub async fn update_description(
    State(state): State<AppState>,
    auth: AuthContext,
    PathId(id): PathId,
    ValidatedJson(req): ValidatedJson<UpdateDescriptionRequest>,
) -> ApiResult<Json<Task>> {
    state
        .kanban
        .update_task_description(auth.user.id, id, &req.description)
        .await?
        .map(Json)
        .ok_or_else(|| task_not_found(id))
}

/// `PATCH /tasks/:id/update_column_id` → `200` + Task
///
/// The target column must be on the caller's board too.
pub async fn update_column_id(
    State(state): State<AppState>,
    auth: AuthContext,
    PathId(id): PathId,
    ValidatedJson(req): ValidatedJson<UpdateColumnIdRequest>,
) -> ApiResult<Json<Task>> {
    state
        .kanban
        .move_task(auth.user.id, id, req.column_id)
        .await?
        .map(Json)
        .ok_or_else(|| task_not_found(id))
}
