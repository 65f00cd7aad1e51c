use serde::{Deserialize, Serialize};

use crate::lti::PlatformSpec;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub grade: GradeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub platforms: Vec<PlatformSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum ProviderConfig {
    #[serde(rename = "service")]
    Service(ProviderServiceConfig),
    #[serde(rename = "local")]
    Local(LocalProviderConfig),
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Service(ProviderServiceConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderServiceConfig {
    #[serde(default = "default_provider_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_provider_url() -> String {
    "http://127.0.0.1:3001".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ProviderServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_url(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// In-process provider for development; launches are seeded from config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalProviderConfig {
    #[serde(default)]
    pub launches: Vec<LocalLaunch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalLaunch {
    pub ltik: String,
    pub user: String,
    #[serde(default)]
    pub resource_link_id: Option<String>,
    #[serde(default)]
    pub line_item: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeConfig {
    /// Tag that identifies this tool's line item on the current route.
    #[serde(default = "default_tag")]
    pub tag: String,

    #[serde(default = "default_label")]
    pub label: String,

    /// Tag used when the legacy route has to create a line item.
    #[serde(default = "default_legacy_tag")]
    pub legacy_tag: String,

    /// Reaction-time scale.
    #[serde(default = "default_score_maximum")]
    pub default_score_maximum: f64,

    #[serde(default = "default_score_given")]
    pub default_score_given: f64,

    #[serde(default = "default_use_launch_lineitem")]
    pub use_launch_lineitem: bool,
}

fn default_tag() -> String {
    "visual-search".to_string()
}

fn default_label() -> String {
    "Visual Search Game Score".to_string()
}

fn default_legacy_tag() -> String {
    "grade".to_string()
}

fn default_score_maximum() -> f64 {
    10_000.0
}

fn default_score_given() -> f64 {
    100.0
}

fn default_use_launch_lineitem() -> bool {
    true
}

impl Default for GradeConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            label: default_label(),
            legacy_tag: default_legacy_tag(),
            default_score_maximum: default_score_maximum(),
            default_score_given: default_score_given(),
            use_launch_lineitem: default_use_launch_lineitem(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_directory")]
    pub directory: String,

    #[serde(default = "default_true")]
    pub console: bool,

    #[serde(default = "default_true")]
    pub file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs/app".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            console: true,
            file: true,
        }
    }
}
