//! Application configuration management.
//!
//! This module handles loading the application configuration,
//! which selects the profile endpoint, batch size and cache location.
//!
//! Configuration is stored at `~/.config/matchmate/config.json`. Environment
//! variables override whatever the file says.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::{DEFAULT_API_URL, DEFAULT_BATCH_SIZE};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "matchmate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "MATCHMATE_API_URL";
pub const ENV_BATCH_SIZE: &str = "MATCHMATE_BATCH_SIZE";
pub const ENV_CACHE_DIR: &str = "MATCHMATE_CACHE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    pub batch_size: Option<usize>,
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply overrides from a variable lookup. Unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|s| !s.trim().is_empty()) {
            self.api_url = Some(url);
        }
        if let Some(raw) = lookup(ENV_BATCH_SIZE) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => self.batch_size = Some(n),
                _ => warn!(value = %raw, "Ignoring invalid {}", ENV_BATCH_SIZE),
            }
        }
        if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|s| !s.trim().is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.filter(|&n| n > 0).unwrap_or(DEFAULT_BATCH_SIZE)
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url(), "https://randomuser.me/api/");
        assert_eq!(config.batch_size(), 10);
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            (ENV_API_URL, "http://localhost:8080/api/"),
            (ENV_BATCH_SIZE, "25"),
            (ENV_CACHE_DIR, "/tmp/matchmate-test"),
        ]));

        assert_eq!(config.api_url(), "http://localhost:8080/api/");
        assert_eq!(config.batch_size(), 25);
        assert_eq!(config.cache_dir().unwrap(), PathBuf::from("/tmp/matchmate-test"));
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = Config {
            batch_size: Some(5),
            ..Default::default()
        };
        config.apply_overrides(lookup(&[(ENV_BATCH_SIZE, "lots"), (ENV_API_URL, "  ")]));
        assert_eq!(config.batch_size(), 5);
        assert_eq!(config.api_url(), DEFAULT_API_URL);

        config.apply_overrides(lookup(&[(ENV_BATCH_SIZE, "0")]));
        assert_eq!(config.batch_size(), 5);
    }

    #[test]
    fn test_zero_batch_size_in_file_falls_back() {
        let config: Config = serde_json::from_str(r#"{"batch_size":0}"#).unwrap();
        assert_eq!(config.batch_size(), DEFAULT_BATCH_SIZE);
    }
}
