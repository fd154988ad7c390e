//! Configuration file handling.
//!
//! This module provides loading and saving of hawkshot configuration
//! from a TOML file, plus environment overrides for the service endpoints.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/hawkshot/config.toml`
//! - macOS: `~/Library/Application Support/hawkshot/config.toml`
//! - Windows: `%APPDATA%\hawkshot\config.toml`
//!
//! # Precedence
//!
//! Built-in defaults, then the config file, then `HAWKSHOT_API_URL` /
//! `HAWKSHOT_COMPARE_URL`, then command-line flags.
//!
//! # Example Configuration
//!
//! ```toml
//! endpoint = "https://bubapower.app.n8n.cloud/webhook/assess"
//! compare_endpoint = "https://bubapower.app.n8n.cloud/webhook/compare"
//! default_format = "table"
//! strict = false
//! animate = true
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://bubapower.app.n8n.cloud/webhook/assess";
pub const DEFAULT_COMPARE_ENDPOINT: &str = "https://bubapower.app.n8n.cloud/webhook/compare";

pub const ENDPOINT_ENV: &str = "HAWKSHOT_API_URL";
pub const COMPARE_ENDPOINT_ENV: &str = "HAWKSHOT_COMPARE_URL";

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use hawkshot::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Endpoint: {}", config.endpoint);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Assessment webhook receiving `{"query": ...}`.
    pub endpoint: String,

    /// Category listing webhook receiving `{"category": ...}`.
    pub compare_endpoint: String,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json", "markdown"
    /// Default: "table"
    pub default_format: String,

    /// Reject success bodies that are not JSON objects.
    ///
    /// Default: false
    pub strict: bool,

    /// Show the animated loading message while a request is in flight.
    ///
    /// Default: true
    pub animate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            compare_endpoint: DEFAULT_COMPARE_ENDPOINT.to_string(),
            default_format: "table".to_string(),
            strict: false,
            animate: true,
        }
    }
}

impl Config {
    /// Loads configuration from the config file and applies environment
    /// overrides.
    ///
    /// If the config file doesn't exist, starts from the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads configuration from a specific file, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overrides endpoints from the environment; blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.endpoint = url;
        }
        if let Some(url) = lookup(COMPARE_ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.compare_endpoint = url;
        }
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hawkshot")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.compare_endpoint, DEFAULT_COMPARE_ENDPOINT);
        assert_eq!(config.default_format, "table");
        assert!(!config.strict);
        assert!(config.animate);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "strict = true\nendpoint = \"http://localhost:5678/webhook/assess\"\n")
            .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert!(config.strict);
        assert_eq!(config.endpoint, "http://localhost:5678/webhook/assess");
        assert_eq!(config.compare_endpoint, DEFAULT_COMPARE_ENDPOINT);
        assert!(config.animate);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "strict = \"very\"").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            default_format: "json".to_string(),
            animate: false,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENDPOINT_ENV, "http://127.0.0.1:9000/assess"),
            (COMPARE_ENDPOINT_ENV, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.endpoint, "http://127.0.0.1:9000/assess");
        assert_eq!(config.compare_endpoint, DEFAULT_COMPARE_ENDPOINT);
    }

    #[test]
    fn test_generate_default_config() {
        let text = Config::generate_default_config();
        assert!(text.contains("endpoint"));
        assert!(text.contains("default_format = \"table\""));
    }
}
