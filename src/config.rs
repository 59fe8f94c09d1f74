//! Dashboard configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, `POCKETBASE_URL` / `POCKETBASE_TOKEN`, then command line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::domain::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8090";
pub const DEFAULT_COLLECTION: &str = "products";
pub const DEFAULT_PAGE_SIZE: u32 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const CONFIG_PATH_ENV: &str = "INVENTORY_DASHBOARD_CONFIG";
pub const BASE_URL_ENV: &str = "POCKETBASE_URL";
pub const TOKEN_ENV: &str = "POCKETBASE_TOKEN";

/// Contents of the TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub collection: Option<String>,
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub sort: Option<String>,
    pub auth_token: Option<String>,
    pub default_low_stock_threshold: Option<u32>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub collection: Option<String>,
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub base_url: Url,
    pub collection: String,
    pub page_size: u32,
    pub timeout: Duration,
    pub sort: Option<String>,
    pub auth_token: Option<String>,
    pub default_low_stock_threshold: u32,
}

impl DashboardConfig {
    /// Loads the config from the process environment and the config file it names.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok().filter(|value| !value.is_empty());
        let path = overrides
            .config_path
            .clone()
            .or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from));
        let file = match path {
            Some(path) => ConfigFile::read(&path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(file, env, overrides)
    }

    pub fn resolve(
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let raw_url = overrides
            .base_url
            .clone()
            .or_else(|| env(BASE_URL_ENV))
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_url)?;

        let collection = overrides
            .collection
            .clone()
            .or(file.collection)
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
        if collection.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "collection",
                reason: "must not be empty".to_string(),
            });
        }

        let page_size = file.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                reason: "must be at least 1".to_string(),
            });
        }

        let timeout_secs = file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            base_url,
            collection,
            page_size,
            timeout: Duration::from_secs(timeout_secs),
            sort: file.sort.filter(|sort| !sort.trim().is_empty()),
            auth_token: env(TOKEN_ENV).or(file.auth_token),
            default_low_stock_threshold: file
                .default_low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config =
            DashboardConfig::resolve(ConfigFile::default(), no_env, &Overrides::default()).unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8090/");
        assert_eq!(config.collection, "products");
        assert_eq!(config.page_size, 500);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.default_low_stock_threshold, 10);
        assert!(config.sort.is_none());
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_file_env_and_flags_layer_in_order() {
        let file: ConfigFile = toml::from_str(
            r#"
            base_url = "http://file.example:8090"
            collection = "stock_items"
            page_size = 200
            sort = "-created"
            auth_token = "file-token"
            default_low_stock_threshold = 3
            "#,
        )
        .unwrap();
        let env = |key: &str| match key {
            BASE_URL_ENV => Some("https://env.example".to_string()),
            TOKEN_ENV => Some("env-token".to_string()),
            _ => None,
        };

        let config = DashboardConfig::resolve(file, env, &Overrides::default()).unwrap();
        assert_eq!(config.base_url.host_str(), Some("env.example"));
        assert_eq!(config.collection, "stock_items");
        assert_eq!(config.page_size, 200);
        assert_eq!(config.sort.as_deref(), Some("-created"));
        assert_eq!(config.auth_token.as_deref(), Some("env-token"));
        assert_eq!(config.default_low_stock_threshold, 3);

        let overrides = Overrides {
            base_url: Some("http://flag.example".to_string()),
            collection: Some("inventory".to_string()),
            ..Default::default()
        };
        let config = DashboardConfig::resolve(ConfigFile::default(), env, &overrides).unwrap();
        assert_eq!(config.base_url.host_str(), Some("flag.example"));
        assert_eq!(config.collection, "inventory");
    }

    #[test]
    fn test_rejects_bad_values() {
        let overrides = Overrides {
            base_url: Some("ftp://files.example".to_string()),
            ..Default::default()
        };
        let err = DashboardConfig::resolve(ConfigFile::default(), no_env, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(scheme) if scheme == "ftp"));

        let overrides = Overrides {
            base_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let err = DashboardConfig::resolve(ConfigFile::default(), no_env, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let file = ConfigFile {
            page_size: Some(0),
            ..Default::default()
        };
        let err = DashboardConfig::resolve(file, no_env, &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "page_size", .. }));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("base_uri = \"http://x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ConfigFile::read(Path::new("/nonexistent/inventory.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/inventory.toml"));
    }
}
