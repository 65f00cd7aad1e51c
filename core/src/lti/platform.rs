use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    #[serde(rename = "JWK_SET")]
    JwkSet,
    /// Key methods this tool never registers itself (`JWK_KEY`, `RSA_KEY`)
    /// but may find on platforms registered by other means.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    pub key: String,
}

/// A trusted LMS instance as held by the trust store. `url` is the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRegistration {
    pub url: String,
    pub name: String,
    pub client_id: String,
    pub authentication_endpoint: String,
    #[serde(rename = "accesstokenEndpoint")]
    pub access_token_endpoint: String,
    pub auth_config: AuthConfig,
}

/// One configured platform entry, as read from `[[platforms]]` or `PLATFORMS`.
/// Fields may be empty; the registry decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub authentication_endpoint: String,
    #[serde(default)]
    pub access_token_endpoint: String,
    #[serde(default)]
    pub jwks_key: String,
}

impl PlatformSpec {
    /// Names of required fields (`name`, `url`, `client_id`) that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.url.trim().is_empty() {
            missing.push("url");
        }
        if self.client_id.trim().is_empty() {
            missing.push("client_id");
        }
        missing
    }

    pub fn to_registration(&self) -> PlatformRegistration {
        PlatformRegistration {
            url: self.url.clone(),
            name: self.name.clone(),
            client_id: self.client_id.clone(),
            authentication_endpoint: self.authentication_endpoint.clone(),
            access_token_endpoint: self.access_token_endpoint.clone(),
            auth_config: AuthConfig {
                method: AuthMethod::JwkSet,
                key: self.jwks_key.clone(),
            },
        }
    }
}
