/// Per-request deadline
///
/// Every request gets `http.request_timeout_secs` to finish. Past that the
/// handler future is dropped, which also drops any store call it was
/// awaiting, and the client gets a regular `503 service_unavailable` error
/// body.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// Aborts the request once `deadline` has elapsed
pub async fn request_deadline(
    State(deadline): State<Duration>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    tokio::time::timeout(deadline, next.run(req))
        .await
        .map_err(|_| {
            ApiError::ServiceUnavailable(format!(
                "{} {} exceeded the {}s request deadline",
                method,
                path,
                deadline.as_secs_f64()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/fast", get(|| async { "done" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    "too late"
                }),
            )
            .layer(middleware::from_fn_with_state(
                Duration::from_secs(5),
                request_deadline,
            ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_handler_gets_structured_503() {
        let response = app()
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "service_unavailable");
        assert!(body.get("debug").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_handler_passes_through() {
        let response = app()
            .oneshot(Request::builder().uri("/fast").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
