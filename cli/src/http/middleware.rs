//! HTTP middleware

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use lti_grade_core::api::extract_ltik;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use crate::http::models::LtikQuery;
use crate::http::session::LaunchVerificationFailed;
use crate::http::state::AppState;
use crate::logging::ACCESS_TARGET;

pub fn create_timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::new(timeout)
}

/// Gives the empty 408 produced by the timeout layer a JSON body.
pub async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(serde_json::json!({ "error": "request timed out" })),
        )
            .into_response();
    }
    response
}

/// Resolves the launch key (bearer header or `ltik` query) and attaches the
/// resulting [`LaunchToken`](lti_grade_core::api::LaunchToken) to the request.
/// Requests without a valid launch pass through untouched; the route decides.
/// A verifier failure is attached as [`LaunchVerificationFailed`].
pub async fn launch_context(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let query_ltik = Query::<LtikQuery>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(q)| q.ltik);
    let ltik = extract_ltik(
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
        query_ltik.as_deref(),
    );

    match state.gate.identify(ltik.as_deref()).await {
        Ok(Some(token)) => {
            req.extensions_mut().insert(token);
        }
        Ok(None) => {}
        Err(e) => {
            req.extensions_mut().insert(LaunchVerificationFailed(e.to_string()));
        }
    }

    next.run(req).await
}

/// Access log, one event per request.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        warn!(
            target: ACCESS_TARGET,
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            target: ACCESS_TARGET,
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{Method, StatusCode},
        middleware,
        response::IntoResponse,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn test_handler() -> impl IntoResponse {
        "OK"
    }

    async fn slow_handler() -> impl IntoResponse {
        tokio::time::sleep(Duration::from_millis(100)).await;
        "Slow response"
    }

    #[tokio::test]
    async fn test_request_logger() {
        let app = Router::new()
            .route("/test", get(test_handler))
            .layer(middleware::from_fn(request_logger));

        let request = Request::builder()
            .method(Method::GET)
            .uri("/test?ltik=secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_timeout_layer() {
        let app = Router::new()
            .route("/slow", get(slow_handler))
            .layer(create_timeout_layer(Duration::from_secs(30)));

        let request = Request::builder()
            .method(Method::GET)
            .uri("/slow")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn timed_out_request_gets_json_body() {
        let app = Router::new()
            .route("/slow", get(slow_handler))
            .layer(create_timeout_layer(Duration::from_millis(10)))
            .layer(middleware::map_response(timeout_body));

        let request = Request::builder()
            .method(Method::GET)
            .uri("/slow")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "request timed out"}));
    }
}
