//! HTTP route handlers

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use lti_grade_core::api::{LineItemOrigin, LineItemPolicy};
use tracing::{error, info};

use crate::http::{
    middleware::launch_context,
    models::*,
    session::LtiSession,
    state::AppState,
};

/// Create all routes
pub fn create_router(state: AppState) -> Router {
    let grade_routes = Router::new()
        .route("/api/grade", post(grade_handler))
        .route("/grade", post(legacy_grade_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), launch_context));

    Router::new()
        .merge(grade_routes)
        .route("/health", get(health_handler))
        .with_state(state)
}

/// POST /api/grade - resolve the tool's line item and submit a score
async fn grade_handler(
    State(state): State<AppState>,
    LtiSession(token): LtiSession,
    body: Bytes,
) -> Result<Json<GradeAccepted>, HttpServerError> {
    state.record_request("/api/grade");

    let req: GradeRequest = parse_optional_body(&body).map_err(HttpServerError::BadRequest)?;
    let score = req.score.or(req.grade).unwrap_or(state.grade.default_score_given);
    let max = req.max.unwrap_or(state.grade.default_score_maximum);

    info!(
        user = %token.user,
        course = token.context_id().unwrap_or("-"),
        score,
        max,
        "Submitting grade"
    );

    let policy = LineItemPolicy::current(&state.grade);
    match state.passback.pass_back(&token, &policy, score, max).await {
        Ok(outcome) => {
            info!(
                line_item = %outcome.line_item.id,
                origin = outcome.line_item.origin.as_str(),
                "Grade submitted successfully"
            );
            Ok(Json(GradeAccepted { ok: true }))
        }
        Err(e) => {
            error!(user = %token.user, error = %e, "Grade submission error");
            state.record_error();
            Err(HttpServerError::from_grade(e))
        }
    }
}

/// POST /grade - legacy contract: fixed maximum, raw upstream response
async fn legacy_grade_handler(
    State(state): State<AppState>,
    LtiSession(token): LtiSession,
    body: Bytes,
) -> Result<Json<serde_json::Value>, HttpServerError> {
    state.record_request("/grade");

    let legacy_bad_request = |message: String| HttpServerError::Legacy {
        status: StatusCode::BAD_REQUEST,
        message,
    };
    let req: LegacyGradeRequest = parse_optional_body(&body).map_err(legacy_bad_request)?;
    let score = req
        .grade
        .ok_or_else(|| legacy_bad_request("grade is required".into()))?;
    let max = state.grade.default_score_maximum;

    info!(
        user = %token.user,
        course = token.context_id().unwrap_or("-"),
        score,
        "Submitting legacy grade"
    );

    let policy = LineItemPolicy::legacy(&state.grade);
    match state.passback.pass_back(&token, &policy, score, max).await {
        Ok(outcome) => {
            if outcome.line_item.origin == LineItemOrigin::Created {
                info!(line_item = %outcome.line_item.id, "Created new line item");
            }
            Ok(Json(outcome.receipt.body))
        }
        Err(e) => {
            error!(user = %token.user, error = %e, "Legacy grade endpoint error");
            state.record_error();
            Err(HttpServerError::from_legacy(e))
        }
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (uptime_secs, requests, errors) = match state.stats.read() {
        Ok(stats) => (
            stats.started_at.elapsed().as_secs(),
            stats.total_requests(),
            stats.errors,
        ),
        Err(_) => (0, 0, 0),
    };
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.services.grades.name().to_string(),
        uptime_secs,
        requests,
        errors,
    })
}
