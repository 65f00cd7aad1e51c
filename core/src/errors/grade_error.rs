// core/src/errors/grade_error.rs
use thiserror::Error;

use super::ProviderError;

#[derive(Debug, Error)]
pub enum GradeError {
    #[error("Not an LTI session")]
    Unauthenticated,

    #[error("launch verification unavailable: {0}")]
    LaunchVerification(#[source] ProviderError),

    #[error("launch carries no resource link id")]
    MissingResourceLink,

    #[error("invalid score: {0}")]
    InvalidScore(String),

    #[error("line item resolution failed: {0}")]
    LineItemResolution(#[source] ProviderError),

    #[error("{message}")]
    UpstreamSubmission {
        message: String,
        #[source]
        source: ProviderError,
    },
}

impl GradeError {
    pub fn upstream_submission(source: ProviderError) -> Self {
        GradeError::UpstreamSubmission {
            message: source.to_string(),
            source,
        }
    }

    /// Errors caused by the caller or the launch rather than the LMS.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GradeError::Unauthenticated
                | GradeError::MissingResourceLink
                | GradeError::InvalidScore(_)
        )
    }
}
