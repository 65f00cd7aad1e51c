//! Collaborator bundle handed to the HTTP layer and the startup bootstrap.
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::ConfigError;
use crate::provider::{GradeService, LaunchVerifier, PlatformStore};

#[derive(Clone)]
pub struct Services {
    pub launch: Arc<dyn LaunchVerifier>,
    pub grades: Arc<dyn GradeService>,
    pub platforms: Arc<dyn PlatformStore>,
}

pub trait ServicesFactory {
    fn build_services(&self, cfg: &AppConfig) -> Result<Services, ConfigError>;
}
