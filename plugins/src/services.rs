//! ServicesFactory implementation: builds the launch / grade / trust-store collaborators from config.
use lti_grade_core::api::{AppConfig, ConfigError, Services, ServicesFactory};

use crate::factory;

pub struct PluginServicesFactory;

impl Default for PluginServicesFactory {
    fn default() -> Self {
        Self
    }
}

impl ServicesFactory for PluginServicesFactory {
    fn build_services(&self, cfg: &AppConfig) -> Result<Services, ConfigError> {
        factory::build_services(cfg)
    }
}
