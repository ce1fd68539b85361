/// In-memory store backends
///
/// Behave like the PostgreSQL backends for everything the services rely on:
/// generated serial IDs, the email unique constraint, foreign keys from
/// tasks to columns with cascading delete, board scoping of every write, and
/// the board join ordering.
///
/// Used by the test suites and for running the API without a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CredentialStore, KanbanStore, StoreError};
use crate::models::board::{Board, BoardBuilder, BoardRow};
use crate::models::column::{Column, CreateColumn};
use crate::models::task::{CreateTask, Task};
use crate::models::user::{CreateUser, User};

#[derive(Default)]
struct UserTable {
    next_id: i32,
    rows: BTreeMap<i32, User>,
}

/// In-memory credential store
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<UserTable>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut table = self.users.write().await;

        if table.rows.values().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        table.next_id += 1;
        let user = User {
            id: table.next_id,
            email: data.email,
            password_hash: data.password_hash,
        };
        table.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let table = self.users.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.rows.get(&id).cloned())
    }
}

#[derive(Default)]
struct KanbanTables {
    next_column_id: i32,
    next_task_id: i32,
    columns: BTreeMap<i32, Column>,
    tasks: BTreeMap<i32, Task>,
}

/// In-memory column/task store
#[derive(Default)]
pub struct MemoryKanbanStore {
    tables: RwLock<KanbanTables>,
}

impl MemoryKanbanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KanbanTables {
    /// True if `column_id` exists on a board other than `user_id`'s
    fn on_other_board(&self, user_id: i32, column_id: i32) -> bool {
        self.columns
            .get(&column_id)
            .is_some_and(|column| column.user_id != user_id)
    }

    /// ID of a task on `user_id`'s board
    fn owned_task(&self, user_id: i32, id: i32) -> Option<i32> {
        let task = self.tasks.get(&id)?;
        let column = self.columns.get(&task.column_id)?;
        (column.user_id == user_id).then_some(task.id)
    }
}

fn missing_column() -> StoreError {
    StoreError::ForeignKeyViolation("tasks_column_id_fkey".to_string())
}

#[async_trait]
impl KanbanStore for MemoryKanbanStore {
    async fn create_column(&self, data: CreateColumn) -> Result<Column, StoreError> {
        let mut tables = self.tables.write().await;

        tables.next_column_id += 1;
        let column = Column {
            id: tables.next_column_id,
            user_id: data.user_id,
            name: data.name,
        };
        tables.columns.insert(column.id, column.clone());

        Ok(column)
    }

    async fn delete_column(&self, user_id: i32, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        match tables.columns.get(&id) {
            Some(column) if column.user_id == user_id => {}
            _ => return Ok(false),
        }
        tables.columns.remove(&id);
        tables.tasks.retain(|_, task| task.column_id != id);

        Ok(true)
    }

    async fn rename_column(
        &self,
        user_id: i32,
        id: i32,
        name: &str,
    ) -> Result<Option<Column>, StoreError> {
        let mut tables = self.tables.write().await;

        Ok(tables
            .columns
            .get_mut(&id)
            .filter(|column| column.user_id == user_id)
            .map(|column| {
                column.name = name.to_string();
                column.clone()
            }))
    }

    async fn create_task(&self, user_id: i32, data: CreateTask) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.on_other_board(user_id, data.column_id) {
            return Ok(None);
        }
        if !tables.columns.contains_key(&data.column_id) {
            return Err(missing_column());
        }

        tables.next_task_id += 1;
        let task = Task {
            id: tables.next_task_id,
            column_id: data.column_id,
            description: data.description,
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(Some(task))
    }

    async fn delete_task(&self, user_id: i32, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(id) = tables.owned_task(user_id, id) else {
            return Ok(false);
        };
        Ok(tables.tasks.remove(&id).is_some())
    }

    async fn update_task_description(
        &self,
        user_id: i32,
        id: i32,
        description: &str,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(id) = tables.owned_task(user_id, id) else {
            return Ok(None);
        };
        Ok(tables.tasks.get_mut(&id).map(|task| {
            task.description = description.to_string();
            task.clone()
        }))
    }

    async fn move_task(
        &self,
        user_id: i32,
        id: i32,
        column_id: i32,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(id) = tables.owned_task(user_id, id) else {
            return Ok(None);
        };
        if tables.on_other_board(user_id, column_id) {
            return Ok(None);
        }
        if !tables.columns.contains_key(&column_id) {
            return Err(missing_column());
        }

        Ok(tables.tasks.get_mut(&id).map(|task| {
            task.column_id = column_id;
            task.clone()
        }))
    }

    async fn get_board_by_user_id(&self, user_id: i32) -> Result<Board, StoreError> {
        let tables = self.tables.read().await;
        let mut builder = BoardBuilder::new();

        // Same row stream the SQL join produces: columns by id, tasks by id,
        // one all-NULL task row for an empty column.
        for column in tables.columns.values().filter(|c| c.user_id == user_id) {
            let mut tasks = tables
                .tasks
                .values()
                .filter(|t| t.column_id == column.id)
                .peekable();

            if tasks.peek().is_none() {
                builder.push_row(BoardRow {
                    column_id: column.id,
                    column_name: column.name.clone(),
                    task_id: None,
                    task_description: None,
                });
                continue;
            }

            for task in tasks {
                builder.push_row(BoardRow {
                    column_id: column.id,
                    column_name: column.name.clone(),
                    task_id: Some(task.id),
                    task_description: Some(task.description.clone()),
                });
            }
        }

        Ok(builder.finish())
    }
}
