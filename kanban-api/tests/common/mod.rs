//! Common test utilities for API tests
//!
//! Builds the full router over in-memory stores and drives it with
//! `tower::ServiceExt::oneshot`, so no server or infrastructure is needed.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use kanban_api::app::{build_router, AppState, Backends};
use kanban_api::config::{Backend, Config};
use serde_json::Value;
use tower::ServiceExt;

/// Response as seen by a client
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Session token from the `Set-Cookie` header, if any
    pub fn session_token(&self, cookie_name: &str) -> Option<String> {
        let cookie = self.headers.get(header::SET_COOKIE)?.to_str().ok()?;
        let (name, rest) = cookie.split_once('=')?;
        if name != cookie_name {
            return None;
        }
        let value = rest.split(';').next()?.to_string();
        (!value.is_empty()).then_some(value)
    }
}

/// Test context with a router over fresh in-memory stores
pub struct TestContext {
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config {
            backend: Backend::Memory,
            ..Default::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_backends(config, Backends::in_memory())
    }

    pub fn with_backends(config: Config, backends: Backends) -> Self {
        let state = AppState::new(config.clone(), backends);
        Self {
            app: build_router(state),
            config,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.session.name
    }

    /// Sends one request; `token` goes into the session cookie
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{}={}", self.cookie_name(), token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send_request(builder.body(body).unwrap()).await
    }

    /// Sends a prebuilt request
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Signs up and returns (user id, session token)
    pub async fn signup(&self, email: &str, password: &str) -> (i64, String) {
        let response = self
            .send(
                Method::POST,
                "/auth/signup",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "signup failed: {}", response.body);
        let token = response
            .session_token(self.cookie_name())
            .expect("signup sets the session cookie");

        (response.body["id"].as_i64().unwrap(), token)
    }

    /// Creates a column and returns its id
    pub async fn create_column(&self, token: &str, user_id: i64, name: &str) -> i64 {
        let response = self
            .send(
                Method::POST,
                "/columns/create",
                Some(token),
                Some(serde_json::json!({ "user_id": user_id, "name": name })),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "create column failed: {}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    /// Creates a task and returns its id
    pub async fn create_task(&self, token: &str, column_id: i64, description: &str) -> i64 {
        let response = self
            .send(
                Method::POST,
                "/tasks/create",
                Some(token),
                Some(serde_json::json!({ "column_id": column_id, "description": description })),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "create task failed: {}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}
