use lti_grade_core::api::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("platform bootstrap failed for: {0}")]
    Bootstrap(String),

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),
}
