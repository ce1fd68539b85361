/// Debug error bodies
///
/// With `http.debug_errors_response` enabled, error responses that carry an
/// [`ErrorDebug`] extension get its text copied into the body's `debug`
/// field. Disabled, responses pass through untouched.
///
/// ```json
/// {
///   "error": "internal_error",
///   "message": "An internal error occurred",
///   "debug": "Database error: connection reset by peer"
/// }
/// ```

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::{ErrorDebug, ErrorResponse};

/// Largest error body the middleware will rewrite
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Copies internal error detail into error bodies when `enabled`
pub async fn debug_errors(State(enabled): State<bool>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    if !enabled {
        return response;
    }

    let Some(ErrorDebug(detail)) = response.extensions().get::<ErrorDebug>().cloned() else {
        return response;
    };

    let (mut parts, body) = response.into_parts();

    let bytes = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Could not buffer error body: {}", e);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let Ok(mut error) = serde_json::from_slice::<ErrorResponse>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };
    error.debug = Some(detail);

    match serde_json::to_vec(&error) {
        Ok(json) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(json))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn error_body(enabled: bool) -> serde_json::Value {
        let app = Router::new()
            .route(
                "/fail",
                get(|| async { Err::<(), _>(ApiError::InternalError("pool exhausted".to_string())) }),
            )
            .layer(middleware::from_fn_with_state(enabled, debug_errors));

        let response = app
            .oneshot(Request::builder().uri("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_debug_field_when_enabled() {
        let body = error_body(true).await;

        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");
        assert_eq!(body["debug"], "pool exhausted");
    }

    #[tokio::test]
    async fn test_no_debug_field_when_disabled() {
        let body = error_body(false).await;

        assert_eq!(body["error"], "internal_error");
        assert!(body.get("debug").is_none());
    }
}
