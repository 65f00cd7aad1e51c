use std::sync::Arc;

use lti_grade_core::api::{AppConfig, ConfigError, ProviderConfig, Services};

use crate::provider::{LocalProvider, ProviderClient};

pub fn build_services(cfg: &AppConfig) -> Result<Services, ConfigError> {
    match &cfg.provider {
        ProviderConfig::Service(svc_cfg) => {
            let client = Arc::new(
                ProviderClient::new(
                    svc_cfg.base_url.clone(),
                    svc_cfg.api_key.clone(),
                    svc_cfg.timeout_ms,
                )
                .map_err(|e| ConfigError::Validation(format!("cannot build provider client: {e}")))?,
            );
            tracing::info!(base_url = %svc_cfg.base_url, "using remote lti provider");
            Ok(Services {
                launch: client.clone(),
                grades: client.clone(),
                platforms: client,
            })
        }
        ProviderConfig::Local(local_cfg) => {
            let provider = Arc::new(LocalProvider::from_config(local_cfg));
            tracing::warn!(
                launches = local_cfg.launches.len(),
                "using in-memory local provider, grades are not sent to any LMS"
            );
            Ok(Services {
                launch: provider.clone(),
                grades: provider.clone(),
                platforms: provider,
            })
        }
    }
}
