/// Database models for the kanban board
///
/// # Models
///
/// - `user`: User accounts and their outward (hash-free) representation
/// - `column`: Board columns owned by a user
/// - `task`: Tasks owned by a column
/// - `board`: The derived, never-persisted nested board
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::board::Board;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let board = Board::find_by_user_id(&pool, 1).await?;
/// for column in &board.columns {
///     println!("{}: {} tasks", column.name, column.tasks.len());
/// }
/// # Ok(())
/// # }
/// ```

pub mod board;
pub mod column;
pub mod task;
pub mod user;
