// core/src/errors/provider_error.rs
use thiserror::Error;

/// Failure reported by the LTI Advantage provider (launch verification,
/// grade service or platform trust store).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("lti provider unavailable")]
    Unavailable,

    #[error("request timeout")]
    Timeout,

    #[error("unauthorized (check provider api key)")]
    Unauthorized,

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("unexpected status: {status}: {body_snippet}")]
    HttpStatus { status: u16, body_snippet: String },

    #[error("transport error: {0}")]
    Transport(#[source] anyhow::Error),

    #[error("decode/serde error: {0}")]
    Decode(#[source] anyhow::Error),
}
