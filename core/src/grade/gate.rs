use std::sync::Arc;

use crate::errors::GradeError;
use crate::lti::LaunchToken;
use crate::provider::LaunchVerifier;

/// Turns a presented launch key into a validated [`LaunchToken`] and rejects
/// requests that carry none.
#[derive(Clone)]
pub struct LaunchContextGate {
    verifier: Arc<dyn LaunchVerifier>,
}

impl LaunchContextGate {
    pub fn new(verifier: Arc<dyn LaunchVerifier>) -> Self {
        Self { verifier }
    }

    /// Resolves `ltik` through the verifier. A missing or unknown key is
    /// `Ok(None)`; a verifier that cannot answer is `LaunchVerification`.
    pub async fn identify(&self, ltik: Option<&str>) -> Result<Option<LaunchToken>, GradeError> {
        let Some(ltik) = ltik.map(str::trim).filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        match self.verifier.verify(ltik).await {
            Ok(Some(mut token)) => {
                if token.ltik.is_none() {
                    token.ltik = Some(ltik.to_string());
                }
                Ok(Some(token))
            }
            Ok(None) => {
                tracing::debug!(verifier = self.verifier.name(), "launch key rejected");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(
                    verifier = self.verifier.name(),
                    error = %e,
                    "launch verification failed"
                );
                Err(GradeError::LaunchVerification(e))
            }
        }
    }

    /// Pure guard: the token if one was attached, `Unauthenticated` otherwise.
    pub fn authorize(token: Option<LaunchToken>) -> Result<LaunchToken, GradeError> {
        token.ok_or(GradeError::Unauthenticated)
    }
}

/// Launch key from `Authorization: Bearer <ltik>`, else the already decoded
/// `ltik` query value. The header wins when both are present.
pub fn extract_ltik(authorization: Option<&str>, query_ltik: Option<&str>) -> Option<String> {
    let from_header = authorization.and_then(|h| {
        let (scheme, value) = h.trim().split_once(' ')?;
        scheme
            .eq_ignore_ascii_case("bearer")
            .then(|| value.trim())
            .filter(|v| !v.is_empty())
    });
    from_header
        .or_else(|| query_ltik.map(str::trim).filter(|v| !v.is_empty()))
        .map(str::to_string)
}
