/// Board endpoint (session required)
///
/// # Endpoint
///
/// ```text
/// GET /boards/:user_id
/// ```
///
/// # Response
///
/// Columns in ascending ID order, each with its tasks in ascending ID
/// order. Columns without tasks carry an empty list; a user without columns
/// gets `{"columns": []}`.
///
/// ```json
/// {
///   "columns": [
///     { "id": 1, "name": "Todo", "tasks": [{ "id": 3, "column_id": 1, "description": "Write docs" }] },
///     { "id": 2, "name": "Done", "tasks": [] }
///   ]
/// }
/// ```
///
/// Only the owner may read a board; anyone else gets `404`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::PathId,
};
use axum::{extract::State, Json};
use kanban_shared::{auth::middleware::AuthContext, models::board::Board};

pub async fn get_board(
    State(state): State<AppState>,
    auth: AuthContext,
    PathId(user_id): PathId,
) -> ApiResult<Json<Board>> {
    if user_id != auth.user.id {
        return Err(ApiError::NotFound(format!("Board of user {} not found", user_id)));
    }

    let board = state.kanban.get_board_by_user_id(user_id).await?;

    tracing::debug!(user_id, columns = board.columns.len(), "Board loaded");

    Ok(Json(board))
}
