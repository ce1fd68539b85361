//! # Kanban Shared Library
//!
//! Domain types, storage backends and the authentication core used by the
//! kanban API server.
//!
//! ## Module Organization
//!
//! - `models`: Users, columns, tasks and the derived board
//! - `store`: Storage contracts plus PostgreSQL and in-memory backends
//! - `session`: Session tokens, session stores and the session service
//! - `auth`: Password hashing, the auth service and the request auth gate
//! - `db`: Connection pool and migrations
//! - `redis`: Redis client wrapper

pub mod auth;
pub mod db;
pub mod models;
pub mod redis;
pub mod session;
pub mod store;

/// Current version of the kanban shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
