//! Extractor that enforces an attached launch token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lti_grade_core::api::{LaunchContextGate, LaunchToken};

use super::models::HttpServerError;

/// The validated launch for this request. Rejects before the handler (and
/// before the body is read): 401 when no token was attached, 503 when the
/// verifier could not be reached.
#[derive(Debug, Clone)]
pub struct LtiSession(pub LaunchToken);

/// Set by the launch middleware when the verifier failed for this request.
#[derive(Debug, Clone)]
pub struct LaunchVerificationFailed(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for LtiSession
where
    S: Send + Sync,
{
    type Rejection = HttpServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts.extensions.get::<LaunchToken>().cloned();
        if token.is_none() {
            if let Some(LaunchVerificationFailed(message)) =
                parts.extensions.get::<LaunchVerificationFailed>()
            {
                return Err(HttpServerError::LaunchUnavailable(message.clone()));
            }
        }
        LaunchContextGate::authorize(token)
            .map(LtiSession)
            .map_err(|_| HttpServerError::Unauthenticated)
    }
}
