use std::path::Path;

use crate::errors::ConfigError;

use super::platforms::parse_platforms;
use super::types::{AppConfig, ProviderConfig};

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Reads `path` (must exist) or `./config.toml` (optional), then applies
/// environment overrides and validates the result.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut cfg = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.display().to_string()));
            }
            read_file(p)?
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => read_file(Path::new(DEFAULT_CONFIG_FILE))?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    validate(&cfg)?;
    Ok(cfg)
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|e| ConfigError::Parse(e.into()))
}

pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("HOST") {
        cfg.server.host = v;
    }
    if let Some(v) = get("PORT") {
        cfg.server.port = v.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::EnvInvalid {
                key: "PORT".into(),
                source: e.into(),
            }
        })?;
    }

    if let ProviderConfig::Service(ref mut svc_cfg) = cfg.provider {
        if let Some(v) = get("LTI_PROVIDER_URL") {
            svc_cfg.base_url = v;
        }
        if let Some(v) = get("LTI_PROVIDER_API_KEY") {
            svc_cfg.api_key = v;
        }
    }

    if let Some(v) = get("LOG_DIR") {
        cfg.logging.directory = v;
    }

    if let Some(v) = get("PLATFORMS") {
        cfg.platforms = parse_platforms(&v);
    }

    Ok(())
}

pub fn validate(cfg: &AppConfig) -> Result<(), ConfigError> {
    if cfg.server.port == 0 {
        return Err(ConfigError::Validation("server.port must be non-zero".into()));
    }
    let grade = &cfg.grade;
    if grade.tag.trim().is_empty() || grade.legacy_tag.trim().is_empty() {
        return Err(ConfigError::Validation("grade tags must not be empty".into()));
    }
    if !grade.default_score_maximum.is_finite() || grade.default_score_maximum <= 0.0 {
        return Err(ConfigError::Validation(
            "grade.default_score_maximum must be positive".into(),
        ));
    }
    if let ProviderConfig::Service(svc_cfg) = &cfg.provider {
        if !(svc_cfg.base_url.starts_with("http://") || svc_cfg.base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "provider.base_url is not an http(s) url: {}",
                svc_cfg.base_url
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_visual_search_tool() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.grade.tag, "visual-search");
        assert_eq!(cfg.grade.legacy_tag, "grade");
        assert_eq!(cfg.grade.default_score_maximum, 10_000.0);
        assert!(cfg.platforms.is_empty());
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn reads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8443

[provider]
provider = "local"

[[provider.launches]]
ltik = "dev"
user = "student-1"
resource_link_id = "rl-1"

[grade]
tag = "reaction-time"

[[platforms]]
name = "Moodle"
url = "https://moodle.test"
client_id = "cid"
"#
        )
        .unwrap();

        let cfg = read_file(file.path()).unwrap();
        assert_eq!(cfg.server.port, 8443);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.grade.tag, "reaction-time");
        assert_eq!(cfg.grade.label, "Visual Search Game Score");
        assert_eq!(cfg.platforms.len(), 1);
        match cfg.provider {
            ProviderConfig::Local(local) => assert_eq!(local.launches[0].user, "student-1"),
            other => panic!("unexpected provider: {other:?}"),
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn env_platforms_replace_file_list() {
        let mut cfg = AppConfig::default();
        cfg.platforms = parse_platforms("Old,https://old.test,cid");
        apply_env_overrides(
            &mut cfg,
            env(&[("PLATFORMS", "A,https://a.test,c1;B,https://b.test,c2")]),
        )
        .unwrap();
        let urls: Vec<_> = cfg.platforms.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.test", "https://b.test"]);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = AppConfig::default();
        cfg.platforms = parse_platforms("Old,https://old.test,cid");
        apply_env_overrides(&mut cfg, env(&[("PLATFORMS", "  "), ("PORT", "")])).unwrap();
        assert_eq!(cfg.platforms.len(), 1);
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn invalid_port_is_reported() {
        let mut cfg = AppConfig::default();
        let err = apply_env_overrides(&mut cfg, env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvInvalid { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn provider_env_overrides_apply_to_service() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(
            &mut cfg,
            env(&[
                ("LTI_PROVIDER_URL", "https://lti.example.org"),
                ("LTI_PROVIDER_API_KEY", "k"),
            ]),
        )
        .unwrap();
        let ProviderConfig::Service(svc) = &cfg.provider else {
            panic!("expected service provider");
        };
        assert_eq!(svc.base_url, "https://lti.example.org");
        assert_eq!(svc.api_key, "k");
    }

    #[test]
    fn rejects_non_http_provider_url() {
        let mut cfg = AppConfig::default();
        if let ProviderConfig::Service(ref mut svc) = cfg.provider {
            svc.base_url = "mongodb://localhost".into();
        }
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }
}
