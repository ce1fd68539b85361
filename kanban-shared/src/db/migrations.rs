/// Schema migrations
///
/// SQL files live in `migrations/` at the workspace root and are embedded at
/// compile time with `sqlx::migrate!`. Migrations run once at startup.
///
/// ```text
/// users   (id, email UNIQUE, password_hash)
/// columns (id, user_id -> users ON DELETE CASCADE, name)
/// tasks   (id, column_id -> columns ON DELETE CASCADE, description)
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Applies all pending migrations
///
/// # Errors
///
/// Returns an error if a migration fails or the database connection drops
/// mid-run; a failed migration is rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("../migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
