/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with startup retry and health checks
/// - `migrations`: embedded schema migrations
///
/// Query code lives next to the row types in `models`.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::db::migrations::run_migrations;
/// use kanban_shared::db::pool::{create_pool_with_retry, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool_with_retry(&config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
