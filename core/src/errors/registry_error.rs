// core/src/errors/registry_error.rs
use thiserror::Error;

use super::ProviderError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("incomplete platform entry (missing {missing})")]
    IncompleteEntry { missing: String },

    #[error("failed to register platform {url}: {source}")]
    PlatformRegistration {
        url: String,
        #[source]
        source: ProviderError,
    },
}
