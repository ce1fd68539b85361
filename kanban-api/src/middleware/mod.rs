/// Middleware modules for the API server
///
/// - `security`: hardening response headers
/// - `debug_errors`: internal error detail in error bodies (opt-in)
/// - `session`: the auth gate as an axum middleware
/// - `deadline`: per-request deadline with a structured `503`

pub mod deadline;
pub mod debug_errors;
pub mod security;
pub mod session;
