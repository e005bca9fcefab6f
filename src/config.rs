use crate::controller::DEFAULT_FLASH_DURATION;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the table metadata backend
    pub api_base_url: String,
    /// Request timeout. Unset keeps the HTTP client's default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// How long the "saved" indication stays on a card
    #[serde(default = "default_flash_millis")]
    pub flash_millis: u64,
    /// `--timeout` for this run only; never written back to disk
    #[serde(skip)]
    pub timeout_override: Option<u64>,
}

fn default_flash_millis() -> u64 {
    DEFAULT_FLASH_DURATION.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            request_timeout_secs: None,
            flash_millis: default_flash_millis(),
            timeout_override: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".table-memo"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Default log file location
    pub fn log_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("table-memo.log"))
    }

    /// `Ok(None)` when there is no config file yet
    pub fn load() -> anyhow::Result<Option<Config>> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Option<Config>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(Some(config))
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Layer command-line values over this config
    pub fn with_overrides(mut self, api_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if timeout_secs.is_some() {
            self.timeout_override = timeout_secs;
        }
        self
    }

    pub fn has_api_url(&self) -> bool {
        !self.api_base_url.trim().is_empty()
    }

    /// Zero means no timeout was set
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_override
            .or(self.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            api_base_url: "http://localhost:9000".to_string(),
            request_timeout_secs: Some(5),
            flash_millis: 1500,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), Some(config));
    }

    #[test]
    fn test_load_missing_or_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(Config::load_from(&path).unwrap(), None);

        fs::write(&path, "{ not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("invalid config in"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_base_url": "https://example.com"}"#).unwrap();

        let config = Config::load_from(&path).unwrap().unwrap();
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.flash_duration(), Duration::from_millis(2000));
    }

    #[test]
    fn test_overrides() {
        let config = Config {
            api_base_url: "http://file".to_string(),
            ..Default::default()
        };

        let unchanged = config.clone().with_overrides(Some("  ".to_string()), None);
        assert_eq!(unchanged, config);

        let overridden = config.with_overrides(Some("http://cli".to_string()), Some(3));
        assert_eq!(overridden.api_base_url, "http://cli");
        assert_eq!(overridden.request_timeout(), Some(Duration::from_secs(3)));
        assert!(overridden.has_api_url());
        assert!(!Config::default().has_api_url());
    }

    #[test]
    fn test_timeout_override_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            api_base_url: "http://file".to_string(),
            request_timeout_secs: Some(30),
            ..Default::default()
        }
        .with_overrides(None, Some(3));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(3)));

        config.save_to(&path).unwrap();
        let saved = Config::load_from(&path).unwrap().unwrap();
        assert_eq!(saved.request_timeout_secs, Some(30));
        assert_eq!(saved.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_timeout_is_unset() {
        let config = Config {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.with_overrides(None, Some(0)).request_timeout(), None);
    }
}
