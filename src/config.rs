//! Configuration Management
//!
//! Settings come from command-line flags and environment variables first,
//! then from an optional JSON file, then from built-in defaults. The API key
//! is never read from the file.

use crate::render::{
    ApiKey, ClientOptions, ResourceId, SuccessPolicy, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Directory per-run log files are written to unless configured otherwise
pub const DEFAULT_LOG_DIR: &str = "log";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no API key: pass --api-key or set RENDER_API_KEY")]
    MissingApiKey,

    #[error("no service IDs: pass --service-ids or set RENDER_SERVICE_IDS")]
    MissingServiceIds,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Optional on-disk configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Override of the Render API root
    #[serde(default)]
    pub base_url: Option<String>,
    /// Comma-separated resource identifiers used when none are given
    #[serde(default)]
    pub service_ids: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub success_policy: Option<SuccessPolicy>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("render-services").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        serde_json::from_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Log directory: explicit value, then the file's, then `log`
    pub fn log_dir(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| self.log_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub service_ids: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub success_policy: Option<SuccessPolicy>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: ApiKey,
    pub resource_ids: Vec<ResourceId>,
    pub client: ClientOptions,
}

impl Settings {
    /// Merge overrides over the file config over defaults
    pub fn resolve(overrides: Overrides, config: Config) -> std::result::Result<Self, ConfigError> {
        let api_key = overrides
            .api_key
            .map(ApiKey::new)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let resource_ids = overrides
            .service_ids
            .or(config.service_ids)
            .map(|ids| parse_resource_ids(&ids))
            .filter(|ids| !ids.is_empty())
            .ok_or(ConfigError::MissingServiceIds)?;

        let timeout = match overrides.timeout_secs.or(config.timeout_secs) {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        let client = ClientOptions {
            base_url: overrides
                .base_url
                .or(config.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout,
            success_policy: overrides
                .success_policy
                .or(config.success_policy)
                .unwrap_or_default(),
        };

        Ok(Self {
            api_key,
            resource_ids,
            client,
        })
    }
}

/// Split a comma-separated identifier list, trimming whitespace and dropping
/// empty entries
pub fn parse_resource_ids(raw: &str) -> Vec<ResourceId> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ResourceId::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ResourceKind;

    fn overrides() -> Overrides {
        Overrides {
            api_key: Some("rnd_test".to_string()),
            service_ids: Some("srv-a".to_string()),
            ..Overrides::default()
        }
    }

    #[test]
    fn test_parse_resource_ids_trims_and_skips_empty() {
        let ids = parse_resource_ids(" srv-a , dpg-b,,  ,srv-c ");
        let raw: Vec<_> = ids.iter().map(ResourceId::as_str).collect();
        assert_eq!(raw, vec!["srv-a", "dpg-b", "srv-c"]);
        assert_eq!(ids[1].kind(), ResourceKind::Database);
        assert!(parse_resource_ids(" , ,").is_empty());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(overrides(), Config::default()).unwrap();
        assert_eq!(settings.client, ClientOptions::default());
        assert_eq!(settings.resource_ids, vec![ResourceId::new("srv-a")]);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let config = Config {
            base_url: Some("http://file.example/v1".to_string()),
            service_ids: Some("srv-file".to_string()),
            timeout_secs: Some(30),
            success_policy: Some(SuccessPolicy::Strict),
            log_dir: Some(PathBuf::from("/var/log/render")),
        };
        let overrides = Overrides {
            base_url: Some("http://cli.example/v1".to_string()),
            timeout_secs: Some(5),
            ..overrides()
        };

        let settings = Settings::resolve(overrides, config).unwrap();
        assert_eq!(settings.client.base_url, "http://cli.example/v1");
        assert_eq!(settings.client.timeout, Duration::from_secs(5));
        assert_eq!(settings.client.success_policy, SuccessPolicy::Strict);
        assert_eq!(settings.resource_ids, vec![ResourceId::new("srv-a")]);
    }

    #[test]
    fn test_log_dir_precedence() {
        let config = Config {
            log_dir: Some(PathBuf::from("/var/log/render")),
            ..Config::default()
        };
        assert_eq!(config.log_dir(None), PathBuf::from("/var/log/render"));
        assert_eq!(
            config.log_dir(Some(PathBuf::from("logs"))),
            PathBuf::from("logs")
        );
        assert_eq!(Config::default().log_dir(None), PathBuf::from("log"));
    }

    #[test]
    fn test_service_ids_from_file() {
        let config = Config {
            service_ids: Some("srv-x, dpg-y".to_string()),
            ..Config::default()
        };
        let overrides = Overrides {
            service_ids: None,
            ..overrides()
        };
        let settings = Settings::resolve(overrides, config).unwrap();
        assert_eq!(settings.resource_ids.len(), 2);
    }

    #[test]
    fn test_missing_values() {
        let no_key = Overrides {
            api_key: Some("  ".to_string()),
            ..overrides()
        };
        assert_eq!(
            Settings::resolve(no_key, Config::default()).unwrap_err(),
            ConfigError::MissingApiKey
        );

        let no_ids = Overrides {
            service_ids: Some(",".to_string()),
            ..overrides()
        };
        assert_eq!(
            Settings::resolve(no_ids, Config::default()).unwrap_err(),
            ConfigError::MissingServiceIds
        );

        let zero = Overrides {
            timeout_secs: Some(0),
            ..overrides()
        };
        assert_eq!(
            Settings::resolve(zero, Config::default()).unwrap_err(),
            ConfigError::ZeroTimeout
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"base_url": "http://localhost:9000/v1", "success_policy": "strict", "timeout_secs": 3}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000/v1"));
        assert_eq!(config.success_policy, Some(SuccessPolicy::Strict));
        assert_eq!(config.timeout_secs, Some(3));
        assert_eq!(config.service_ids, None);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_settings_debug_hides_api_key() {
        let settings = Settings::resolve(overrides(), Config::default()).unwrap();
        assert!(!format!("{:?}", settings).contains("rnd_test"));
    }
}
