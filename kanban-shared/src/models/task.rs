/// Task model and database operations
///
/// A task belongs to exactly one column. Changing `column_id` moves the task
/// to another column.
///
/// Every query is scoped to a board: `user_id` must own the column the task
/// sits in, otherwise the task is treated as absent. Naming a column that
/// does not exist at all still reaches the foreign key and fails there.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     column_id INTEGER NOT NULL REFERENCES columns (id) ON DELETE CASCADE,
///     description TEXT NOT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A task card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Generated task ID
    pub id: i32,

    /// Column the task currently sits in
    pub column_id: i32,

    /// Free-form task text
    pub description: String,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub column_id: i32,
    pub description: String,
}

impl Task {
    /// Inserts a new task into a column of `user_id`'s board
    ///
    /// Returns None if the column belongs to another board.
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation if `column_id` does not exist.
    pub async fn create(
        pool: &PgPool,
        user_id: i32,
        data: CreateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (column_id, description)
            SELECT $1, $2
            WHERE NOT EXISTS (
                SELECT 1 FROM columns WHERE id = $1 AND user_id <> $3
            )
            RETURNING id, column_id, description
            "#,
        )
        .bind(data.column_id)
        .bind(data.description)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a task, returning false if it is not on `user_id`'s board
    pub async fn delete(pool: &PgPool, user_id: i32, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks t
            USING columns c
            WHERE t.id = $1 AND c.id = t.column_id AND c.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces the description of a task on `user_id`'s board
    pub async fn update_description(
        pool: &PgPool,
        user_id: i32,
        id: i32,
        description: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks t
            SET description = $1
            FROM columns c
            WHERE t.id = $2 AND c.id = t.column_id AND c.user_id = $3
            RETURNING t.id, t.column_id, t.description
            "#,
        )
        .bind(description)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Moves a task to another column of the same board
    ///
    /// Returns None if the task is not on `user_id`'s board or the target
    /// column belongs to another board.
    pub async fn move_to_column(
        pool: &PgPool,
        user_id: i32,
        id: i32,
        column_id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks t
            SET column_id = $1
            FROM columns c
            WHERE t.id = $2 AND c.id = t.column_id AND c.user_id = $3
              AND NOT EXISTS (
                  SELECT 1 FROM columns dst WHERE dst.id = $1 AND dst.user_id <> $3
              )
            RETURNING t.id, t.column_id, t.description
            "#,
        )
        .bind(column_id)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
