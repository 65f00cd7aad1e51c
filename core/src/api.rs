//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `lti_grade_core::api` instead of reaching into internal modules.

pub use crate::config::{
    AppConfig, GradeConfig, LocalLaunch, LocalProviderConfig, LoggingConfig, ProviderConfig,
    ProviderServiceConfig, ServerConfig,
};
pub use crate::errors::{ConfigError, GradeError, ProviderError, RegistryError};
pub use crate::grade::{
    extract_ltik, GradePassback, LaunchContextGate, LineItemPolicy, LineItemResolver,
    PassbackOutcome, ScoreSubmitter,
};
pub use crate::lti::{
    LaunchToken, LineItem, LineItemOrigin, LineItemQuery, NewLineItem, PlatformRegistration,
    PlatformSpec, ResolvedLineItem, Score, SubmissionReceipt,
};
pub use crate::provider::{GradeService, LaunchVerifier, PlatformStore};
pub use crate::registry::{BootstrapReport, PlatformRegistry};
pub use crate::services::{Services, ServicesFactory};
