pub mod config_error;
pub mod grade_error;
pub mod provider_error;
pub mod registry_error;

pub use config_error::ConfigError;
pub use grade_error::GradeError;
pub use provider_error::ProviderError;
pub use registry_error::RegistryError;
