/// Storage contracts
///
/// Services never talk to PostgreSQL or Redis directly. They hold an
/// `Arc<dyn ...Store>` so the backend is chosen once at startup:
///
/// - [`CredentialStore`]: user records, email uniqueness
/// - [`KanbanStore`]: column/task rows and the board read
/// - [`crate::session::store::SessionStore`]: ephemeral sessions with TTL
///
/// # Backends
///
/// - [`postgres`]: `PgCredentialStore`, `PgKanbanStore`
/// - [`memory`]: `MemoryCredentialStore`, `MemoryKanbanStore` (tests, local runs)

use async_trait::async_trait;
use thiserror::Error;

use crate::models::board::Board;
use crate::models::column::{Column, CreateColumn};
use crate::models::task::{CreateTask, Task};
use crate::models::user::{CreateUser, User};
use crate::redis::RedisClientError;

pub mod memory;
pub mod postgres;

/// Errors raised by any store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A write referenced a row that does not exist
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// The store did not answer in time
    #[error("Store operation timed out")]
    Timeout,

    /// Other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Redis failure
    #[error("Redis error: {0}")]
    Redis(RedisClientError),

    /// Stored value could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                if db_err.is_unique_violation() {
                    StoreError::UniqueViolation(constraint)
                } else if db_err.is_foreign_key_violation() {
                    StoreError::ForeignKeyViolation(constraint)
                } else {
                    StoreError::Database(sqlx::Error::Database(db_err))
                }
            }
            other => StoreError::Database(other),
        }
    }
}

impl From<RedisClientError> for StoreError {
    fn from(err: RedisClientError) -> Self {
        match err {
            RedisClientError::Timeout => StoreError::Timeout,
            other => StoreError::Redis(other),
        }
    }
}

/// Persistent user records
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a user; a duplicate email yields [`StoreError::UniqueViolation`]
    async fn insert(&self, data: CreateUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;
}

/// Column and task rows plus the aggregated board read
///
/// Every write is a single-row, single-statement operation scoped to the
/// board of `user_id`: a row on another user's board behaves exactly like a
/// missing one. Deletes return whether a row was affected; updates return
/// None when the ID is not on the board.
#[async_trait]
pub trait KanbanStore: Send + Sync {
    async fn create_column(&self, data: CreateColumn) -> Result<Column, StoreError>;

    async fn delete_column(&self, user_id: i32, id: i32) -> Result<bool, StoreError>;

    async fn rename_column(
        &self,
        user_id: i32,
        id: i32,
        name: &str,
    ) -> Result<Option<Column>, StoreError>;

    /// Adds a task; None if the column is on another board
    ///
    /// A column that does not exist at all is a
    /// [`StoreError::ForeignKeyViolation`].
    async fn create_task(&self, user_id: i32, data: CreateTask) -> Result<Option<Task>, StoreError>;

    async fn delete_task(&self, user_id: i32, id: i32) -> Result<bool, StoreError>;

    async fn update_task_description(
        &self,
        user_id: i32,
        id: i32,
        description: &str,
    ) -> Result<Option<Task>, StoreError>;

    /// Moves a task between columns of the same board
    ///
    /// None if the task or the target column is on another board; a target
    /// column that does not exist is a [`StoreError::ForeignKeyViolation`].
    async fn move_task(
        &self,
        user_id: i32,
        id: i32,
        column_id: i32,
    ) -> Result<Option<Task>, StoreError>;

    /// Builds the board of `user_id` from one join read
    async fn get_board_by_user_id(&self, user_id: i32) -> Result<Board, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_maps_to_timeout() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Timeout));
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn test_redis_timeout_maps_to_timeout() {
        let err = StoreError::from(RedisClientError::Timeout);
        assert!(matches!(err, StoreError::Timeout));

        let err = StoreError::from(RedisClientError::CommandError("boom".to_string()));
        assert!(matches!(err, StoreError::Redis(_)));
    }
}
