/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Signup, login, logout
/// - `columns`: Column CRUD
/// - `tasks`: Task CRUD
/// - `boards`: Aggregated board read

pub mod auth;
pub mod boards;
pub mod columns;
pub mod health;
pub mod tasks;
