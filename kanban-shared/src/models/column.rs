/// Board column model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE columns (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A column on a user's board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Column {
    /// Generated column ID
    pub id: i32,

    /// Owning user
    pub user_id: i32,

    /// Display name
    pub name: String,
}

/// Input for creating a column
#[derive(Debug, Clone)]
pub struct CreateColumn {
    pub user_id: i32,
    pub name: String,
}

impl Column {
    /// Inserts a new column
    pub async fn create(pool: &PgPool, data: CreateColumn) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO columns (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .fetch_one(pool)
        .await
    }

    /// Deletes a column of `user_id`'s board (and, via cascade, its tasks)
    ///
    /// Returns false if the board has no column with this ID.
    pub async fn delete(pool: &PgPool, user_id: i32, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Renames a column of `user_id`'s board, returning None if it is not there
    pub async fn rename(
        pool: &PgPool,
        user_id: i32,
        id: i32,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Column>(
            r#"
            UPDATE columns
            SET name = $1
            WHERE id = $2 AND user_id = $3
            RETURNING id, user_id, name
            "#,
        )
        .bind(name)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
