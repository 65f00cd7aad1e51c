//! Request/response bodies and the HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lti_grade_core::api::GradeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// `POST /api/grade`. `score` and `grade` are aliases; `score` wins.
#[derive(Debug, Default, Deserialize)]
pub struct GradeRequest {
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub grade: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub max: Option<f64>,
}

/// `POST /grade`.
#[derive(Debug, Default, Deserialize)]
pub struct LegacyGradeRequest {
    #[serde(default, deserialize_with = "lenient_number")]
    pub grade: Option<f64>,
}

/// Query string of a grade request; only the launch key is read.
#[derive(Debug, Default, Deserialize)]
pub struct LtikQuery {
    pub ltik: Option<String>,
}

/// JSON body where every field is optional: an empty body (with or without
/// a content type) is the all-defaults request.
pub fn parse_optional_body<T>(bytes: &[u8]) -> Result<T, String>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| format!("invalid JSON body: {e}"))
}

#[derive(Debug, Serialize)]
pub struct GradeAccepted {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub uptime_secs: u64,
    pub requests: u64,
    pub errors: u64,
}

/// Game clients post numbers, sometimes as strings; `null` means absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberLike {
        Num(f64),
        Text(String),
    }

    match Option::<NumberLike>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberLike::Num(n)) => Ok(Some(n)),
        Some(NumberLike::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberLike::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("not a number: {s:?}"))),
    }
}

pub const NOT_AN_LTI_SESSION: &str = "Not an LTI session";

#[derive(Debug)]
pub enum HttpServerError {
    /// 401 `{"error": "Not an LTI session"}` on both routes.
    Unauthenticated,
    /// 503 `{"error": ...}` when the launch verifier cannot answer.
    LaunchUnavailable(String),
    /// 400 `{"error": ...}`.
    BadRequest(String),
    /// 500 `{"error": "grade passback failed: ..."}`.
    PassbackFailed(String),
    /// Legacy route: `{"err": ...}` with the given status.
    Legacy { status: StatusCode, message: String },
}

impl HttpServerError {
    /// Mapping for `POST /api/grade`.
    pub fn from_grade(err: GradeError) -> Self {
        match err {
            GradeError::Unauthenticated => HttpServerError::Unauthenticated,
            e @ GradeError::LaunchVerification(_) => HttpServerError::LaunchUnavailable(e.to_string()),
            e @ (GradeError::MissingResourceLink | GradeError::InvalidScore(_)) => {
                HttpServerError::BadRequest(e.to_string())
            }
            e => HttpServerError::PassbackFailed(e.to_string()),
        }
    }

    /// Mapping for `POST /grade`.
    pub fn from_legacy(err: GradeError) -> Self {
        match err {
            GradeError::Unauthenticated => HttpServerError::Unauthenticated,
            e @ GradeError::LaunchVerification(_) => HttpServerError::LaunchUnavailable(e.to_string()),
            e if e.is_client_error() => HttpServerError::Legacy {
                status: StatusCode::BAD_REQUEST,
                message: e.to_string(),
            },
            e => HttpServerError::Legacy {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: e.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HttpServerError::Unauthenticated => StatusCode::UNAUTHORIZED,
            HttpServerError::LaunchUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            HttpServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpServerError::PassbackFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpServerError::Legacy { status, .. } => *status,
        }
    }
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            HttpServerError::Unauthenticated => serde_json::json!({ "error": NOT_AN_LTI_SESSION }),
            HttpServerError::LaunchUnavailable(message) | HttpServerError::BadRequest(message) => {
                serde_json::json!({ "error": message })
            }
            HttpServerError::PassbackFailed(message) => {
                serde_json::json!({ "error": format!("grade passback failed: {message}") })
            }
            HttpServerError::Legacy { message, .. } => serde_json::json!({ "err": message }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lti_grade_core::api::ProviderError;

    #[test]
    fn numbers_may_arrive_as_strings() {
        let req: GradeRequest =
            serde_json::from_str(r#"{"grade":"42.5","max":50,"score":null}"#).unwrap();
        assert_eq!(req.score, None);
        assert_eq!(req.grade, Some(42.5));
        assert_eq!(req.max, Some(50.0));
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        assert!(serde_json::from_str::<GradeRequest>(r#"{"score":"fast"}"#).is_err());
    }

    #[test]
    fn upstream_errors_map_to_500_with_prefix_on_current_route() {
        let err = HttpServerError::from_grade(GradeError::upstream_submission(
            ProviderError::Unavailable,
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(err, HttpServerError::PassbackFailed(ref m) if m == "lti provider unavailable"));
    }

    #[test]
    fn empty_body_is_the_default_request() {
        let req: GradeRequest = parse_optional_body(b"").unwrap();
        assert_eq!((req.score, req.grade, req.max), (None, None, None));
        let req: GradeRequest = parse_optional_body(b" \n").unwrap();
        assert_eq!(req.score, None);
        let req: GradeRequest = parse_optional_body(br#"{"score":5}"#).unwrap();
        assert_eq!(req.score, Some(5.0));
        assert!(parse_optional_body::<GradeRequest>(b"{not json").is_err());
    }

    #[test]
    fn ltik_query_is_percent_decoded() {
        let uri: axum::http::Uri = "/api/grade?a=1&ltik=abc%2Edef%3D%3D".parse().unwrap();
        let axum::extract::Query(q) = axum::extract::Query::<LtikQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(q.ltik.as_deref(), Some("abc.def=="));
    }

    #[test]
    fn verifier_outage_is_503_on_both_routes() {
        let current = HttpServerError::from_grade(GradeError::LaunchVerification(
            ProviderError::Timeout,
        ));
        assert_eq!(current.status(), StatusCode::SERVICE_UNAVAILABLE);
        let legacy = HttpServerError::from_legacy(GradeError::LaunchVerification(
            ProviderError::Timeout,
        ));
        assert_eq!(legacy.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn legacy_client_errors_are_400() {
        let err = HttpServerError::from_legacy(GradeError::MissingResourceLink);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
