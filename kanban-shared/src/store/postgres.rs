/// PostgreSQL store backends
///
/// Thin adapters from the store traits onto the model query functions.
/// All calls go through the shared `PgPool`; pool acquisition is bounded by
/// the pool's acquire timeout and surfaces as [`StoreError::Timeout`].

use async_trait::async_trait;
use sqlx::PgPool;

use super::{CredentialStore, KanbanStore, StoreError};
use crate::models::board::Board;
use crate::models::column::{Column, CreateColumn};
use crate::models::task::{CreateTask, Task};
use crate::models::user::{CreateUser, User};

/// Credential store backed by the `users` table
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert(&self, data: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }
}

/// Kanban store backed by the `columns` and `tasks` tables
#[derive(Clone)]
pub struct PgKanbanStore {
    pool: PgPool,
}

impl PgKanbanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KanbanStore for PgKanbanStore {
    async fn create_column(&self, data: CreateColumn) -> Result<Column, StoreError> {
        Ok(Column::create(&self.pool, data).await?)
    }

    async fn delete_column(&self, user_id: i32, id: i32) -> Result<bool, StoreError> {
        Ok(Column::delete(&self.pool, user_id, id).await?)
    }

    async fn rename_column(
        &self,
        user_id: i32,
        id: i32,
        name: &str,
    ) -> Result<Option<Column>, StoreError> {
        Ok(Column::rename(&self.pool, user_id, id, name).await?)
    }

    async fn create_task(&self, user_id: i32, data: CreateTask) -> Result<Option<Task>, StoreError> {
        Ok(Task::create(&self.pool, user_id, data).await?)
    }

    async fn delete_task(&self, user_id: i32, id: i32) -> Result<bool, StoreError> {
        Ok(Task::delete(&self.pool, user_id, id).await?)
    }

    async fn update_task_description(
        &self,
        user_id: i32,
        id: i32,
        description: &str,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::update_description(&self.pool, user_id, id, description).await?)
    }

    async fn move_task(
        &self,
        user_id: i32,
        id: i32,
        column_id: i32,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::move_to_column(&self.pool, user_id, id, column_id).await?)
    }

    async fn get_board_by_user_id(&self, user_id: i32) -> Result<Board, StoreError> {
        Ok(Board::find_by_user_id(&self.pool, user_id).await?)
    }
}
