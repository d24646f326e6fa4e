//! Configuration management for Sleuth.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/sleuth/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fan-out and HTTP behavior
    pub scanning: ScanningConfig,
    /// Credentials for keyed lookup services
    pub api_keys: ApiKeysConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `SLEUTH_WORKERS`: Override worker pool width
    /// - `SLEUTH_TASK_TIMEOUT_SECS`: Override per-lookup timeout (0 disables)
    /// - `SLEUTH_HUNTER_KEY`, `SLEUTH_INTELX_KEY`, `SLEUTH_BREACHDIRECTORY_KEY`,
    ///   `SLEUTH_HIBP_KEY`, `SLEUTH_EMAILREP_KEY`: API keys
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply overrides from a variable source.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SLEUTH_WORKERS") {
            match val.parse::<usize>() {
                Ok(width) if width > 0 => {
                    self.scanning.worker_pool_width = width;
                    tracing::debug!("Override scanning.worker_pool_width from env: {}", width);
                }
                _ => tracing::warn!("Ignoring invalid SLEUTH_WORKERS value '{}'", val),
            }
        }

        if let Some(val) = var("SLEUTH_TASK_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.scanning.task_timeout_secs = secs;
                tracing::debug!("Override scanning.task_timeout_secs from env: {}", secs);
            } else {
                tracing::warn!("Ignoring invalid SLEUTH_TASK_TIMEOUT_SECS value '{}'", val);
            }
        }

        let keys = [
            ("SLEUTH_HUNTER_KEY", &mut self.api_keys.hunter),
            ("SLEUTH_INTELX_KEY", &mut self.api_keys.intelx),
            ("SLEUTH_BREACHDIRECTORY_KEY", &mut self.api_keys.breachdirectory),
            ("SLEUTH_HIBP_KEY", &mut self.api_keys.haveibeenpwned),
            ("SLEUTH_EMAILREP_KEY", &mut self.api_keys.emailrep),
        ];
        for (name, slot) in keys {
            if let Some(val) = var(name).filter(|v| !v.trim().is_empty()) {
                tracing::debug!("Override API key from env: {}", name);
                *slot = Some(val);
            }
        }
    }

    /// Reject values the scanner cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.worker_pool_width == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.worker_pool_width".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.scanning.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.request_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/sleuth/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "sleuth", "sleuth").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Fan-out and HTTP behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Maximum number of lookups running at once
    pub worker_pool_width: usize,
    /// Per-lookup deadline in seconds (0 = wait indefinitely)
    pub task_timeout_secs: u64,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// User agent string sent by every HTTP lookup
    pub user_agent: String,
    /// Maximum number of links kept from a search engine result page
    pub max_search_results: usize,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            worker_pool_width: 16,
            task_timeout_secs: 30,
            request_timeout_secs: 20,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
                .to_string(),
            max_search_results: 10,
        }
    }
}

/// Credentials for keyed lookup services.
///
/// Every key is optional. A lookup whose key is missing completes with a
/// failure outcome instead of aborting the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeysConfig {
    /// hunter.io API key
    pub hunter: Option<String>,
    /// intelx.io API key
    pub intelx: Option<String>,
    /// `RapidAPI` key for `BreachDirectory`
    pub breachdirectory: Option<String>,
    /// haveibeenpwned.com API key
    pub haveibeenpwned: Option<String>,
    /// emailrep.io API key
    pub emailrep: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scanning.worker_pool_width, 16);
        assert_eq!(config.scanning.task_timeout_secs, 30);
        assert_eq!(config.scanning.max_search_results, 10);
        assert!(config.api_keys.hunter.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = AppConfig::default();
        config.api_keys.hunter = Some("h-key".to_string());

        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[scanning]"));
        assert!(toml_str.contains("[api_keys]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.api_keys.hunter.as_deref(), Some("h-key"));
        assert_eq!(
            parsed.scanning.worker_pool_width,
            config.scanning.worker_pool_width
        );
    }

    #[test]
    fn test_load_from_path() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        fs::write(
            &config_path,
            r#"
[scanning]
worker_pool_width = 4

[api_keys]
intelx = "ix-key"
"#,
        )
        .expect("write config file");

        let loaded = AppConfig::load_from(&config_path).expect("load config");
        assert_eq!(loaded.scanning.worker_pool_width, 4);
        assert_eq!(loaded.api_keys.intelx.as_deref(), Some("ix-key"));
        // Unspecified values fall back to defaults
        assert_eq!(loaded.scanning.task_timeout_secs, 30);
    }

    #[test]
    fn test_load_from_missing_path() {
        let tmp = TempDir::new().expect("create temp dir");
        let err = AppConfig::load_from(&tmp.path().join("absent.toml")).expect_err("missing");
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_load_rejects_zero_workers() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[scanning]\nworker_pool_width = 0\n").expect("write config");

        let err = AppConfig::load_from(&config_path).expect_err("zero width is invalid");
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "scanning.worker_pool_width"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SLEUTH_WORKERS", "20"),
            ("SLEUTH_TASK_TIMEOUT_SECS", "0"),
            ("SLEUTH_HIBP_KEY", "hibp-key"),
            ("SLEUTH_EMAILREP_KEY", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|name| vars.get(name).map(ToString::to_string));

        assert_eq!(config.scanning.worker_pool_width, 20);
        assert_eq!(config.scanning.task_timeout_secs, 0);
        assert_eq!(config.api_keys.haveibeenpwned.as_deref(), Some("hibp-key"));
        // Blank values do not count as keys
        assert!(config.api_keys.emailrep.is_none());
    }

    #[test]
    fn test_env_overrides_ignore_invalid_numbers() {
        let mut config = AppConfig::default();
        config.apply_env(|name| match name {
            "SLEUTH_WORKERS" => Some("zero".to_string()),
            "SLEUTH_TASK_TIMEOUT_SECS" => Some("-5".to_string()),
            _ => None,
        });

        assert_eq!(config.scanning.worker_pool_width, 16);
        assert_eq!(config.scanning.task_timeout_secs, 30);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[api_keys]
hunter = "abc"
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.api_keys.hunter.as_deref(), Some("abc"));
        assert_eq!(config.scanning.worker_pool_width, 16);
    }
}
