/// Configuration management for the API server
///
/// Settings are layered, later layers winning:
///
/// 1. Built-in defaults
/// 2. Optional file named by `CONFIG_PATH` (YAML, TOML or JSON by extension)
/// 3. Environment variables `KANBAN__<SECTION>__<KEY>`, e.g. `KANBAN__HTTP__PORT=9000`
/// 4. `DATABASE_URL` and `REDIS_URL`
///
/// A `.env` file is loaded first if present.
///
/// # Sections
///
/// - `backend`: `postgres` (PostgreSQL + Redis) or `memory` (no infrastructure)
/// - `http`: bind address, CORS, request deadline, debug error bodies
/// - `session`: cookie name, Redis key prefix, TTL
/// - `cookie`: session cookie attributes
/// - `database`: pool settings and startup retry
/// - `redis`: connection settings
///
/// # Example
///
/// ```no_run
/// use kanban_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use kanban_shared::db::pool::DatabaseConfig;
use kanban_shared::redis::RedisConfig;
use serde::Deserialize;
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage backend
    pub backend: Backend,

    /// HTTP server configuration
    pub http: HttpConfig,

    /// Session configuration
    pub session: SessionConfig,

    /// Session cookie attributes
    pub cookie: CookieConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub redis: RedisConfig,
}

/// Where users, boards and sessions live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// PostgreSQL for users and boards, Redis for sessions
    #[default]
    Postgres,

    /// Everything in process memory, lost on restart
    Memory,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Include internal error detail in error bodies
    pub debug_errors_response: bool,

    /// Production mode (adds HSTS)
    pub production: bool,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Per-request deadline in seconds
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            debug_errors_response: false,
            production: false,
            cors_origins: vec!["*".to_string()],
            request_timeout_secs: 15,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie carrying the session token
    pub name: String,

    /// Redis key prefix for session records
    pub prefix: String,

    /// Session TTL in seconds
    pub expire_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "session-id".to_string(),
            prefix: "api-session".to_string(),
            expire_secs: 3600,
        }
    }
}

/// Session cookie attributes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    pub path: String,

    /// Cookie Max-Age; the session TTL when unset
    pub max_age_secs: Option<u64>,

    pub secure: bool,

    pub http_only: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            max_age_secs: None,
            secure: false,
            http_only: true,
        }
    }
}

impl Config {
    /// Loads and validates configuration from all layers
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read, a value has the wrong
    /// type, or [`Config::validate`] rejects the result.
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();

        if let Ok(path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(config::File::with_name(&path));
        }

        let config: Config = builder
            .add_source(
                config::Environment::with_prefix("KANBAN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("http.cors_origins"),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("redis.url", env::var("REDIS_URL").ok())?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the server cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend == Backend::Postgres {
            if self.database.url.trim().is_empty() {
                anyhow::bail!("database.url (or DATABASE_URL) is required");
            }
            if self.redis.url.trim().is_empty() {
                anyhow::bail!("redis.url (or REDIS_URL) is required");
            }
        }

        if self.session.expire_secs == 0 {
            anyhow::bail!("session.expire_secs must be greater than zero");
        }

        if self.session.name.trim().is_empty() {
            anyhow::bail!("session.name (the cookie name) must not be empty");
        }

        if self.http.request_timeout_secs == 0 {
            anyhow::bail!("http.request_timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }

    /// Max-Age for the session cookie
    pub fn cookie_max_age(&self) -> u64 {
        self.cookie.max_age_secs.unwrap_or(self.session.expire_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut config = Config::default();
        config.database.url = "postgresql://localhost/kanban".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.backend, Backend::Postgres);
        assert_eq!(config.session.name, "session-id");
        assert_eq!(config.session.prefix, "api-session");
        assert_eq!(config.session.expire_secs, 3600);
        assert_eq!(config.cookie.path, "/");
        assert!(config.cookie.http_only);
        assert_eq!(config.http.request_timeout_secs, 15);
        assert_eq!(config.database.connect_attempts, 5);
    }

    #[test]
    fn test_bind_address() {
        let mut config = valid();
        config.http.host = "127.0.0.1".to_string();
        config.http.port = 9000;

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_cookie_max_age_defaults_to_ttl() {
        let mut config = valid();
        config.session.expire_secs = 120;
        assert_eq!(config.cookie_max_age(), 120);

        config.cookie.max_age_secs = Some(60);
        assert_eq!(config.cookie_max_age(), 60);
    }

    #[test]
    fn test_validate() {
        assert!(valid().validate().is_ok());

        let mut config = valid();
        config.database.url = String::new();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.session.expire_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.session.name = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_backend_needs_no_urls() {
        let config = Config {
            backend: Backend::Memory,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: Config = serde_json::from_str(
            r#"{"backend": "memory", "http": {"port": 3000}, "session": {"expire_secs": 60}}"#,
        )
        .unwrap();

        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.session.expire_secs, 60);
        assert_eq!(config.session.name, "session-id");
    }
}
