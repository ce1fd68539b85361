//! # Kanban API Server Library
//!
//! HTTP surface of the kanban board service.
//!
//! ## Modules
//!
//! - `app`: Application state, backend selection and router builder
//! - `config`: Layered configuration
//! - `cookies`: Session cookie rendering
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: JSON and path extractors with JSON error bodies
//! - `middleware`: Security headers, debug error bodies, session gate
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod cookies;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
