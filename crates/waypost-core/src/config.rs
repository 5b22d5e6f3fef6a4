//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the remote API location, the cache version, and the
//! application-shell URL list cached at install time.
//!
//! Configuration is stored at `~/.config/waypost/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache/data directory paths
const APP_NAME: &str = "waypost";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Durable store file name - one fixed database for all collections
const DB_FILE: &str = "waypost.db";

/// Name prefix of the application-shell cache generation
const SHELL_CACHE_PREFIX: &str = "waypost-shell-v";

/// Name prefix of the API data cache generation
const DATA_CACHE_PREFIX: &str = "waypost-data-v";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote story API, e.g. `https://story-api.dicoding.dev/v1`
    pub api_base_url: String,
    /// Origin of the remote story API; requests to it use Network-First
    pub api_origin: String,
    /// Origin the application shell is served from
    pub app_origin: String,
    /// Cache generation version. Bumping this is the only mechanism that
    /// evicts every stale cached entry.
    pub cache_version: u32,
    /// Application-shell paths cached at install, relative to `app_origin`
    pub shell_urls: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://story-api.dicoding.dev/v1".to_string(),
            api_origin: "https://story-api.dicoding.dev".to_string(),
            app_origin: "https://waypost.app".to_string(),
            cache_version: 1,
            shell_urls: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/app.bundle.js".to_string(),
                "/app.css".to_string(),
                "/images/icon-512x512.png".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Root directory holding the cache generations
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Path of the durable store database file
    pub fn db_path(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(DB_FILE))
    }

    /// Version-qualified name of the live application-shell generation
    pub fn shell_cache_name(&self) -> String {
        format!("{}{}", SHELL_CACHE_PREFIX, self.cache_version)
    }

    /// Version-qualified name of the live API data generation
    pub fn data_cache_name(&self) -> String {
        format!("{}{}", DATA_CACHE_PREFIX, self.cache_version)
    }

    /// Absolute URLs of the application shell, resolved against `app_origin`
    pub fn shell_url_list(&self) -> Result<Vec<Url>> {
        let origin = Url::parse(&self.app_origin)?;
        let mut urls = Vec::with_capacity(self.shell_urls.len());
        for path in &self.shell_urls {
            urls.push(origin.join(path)?);
        }
        Ok(urls)
    }

    /// Whether a URL targets the remote story API
    pub fn is_api_origin(&self, url: &Url) -> bool {
        url.origin().ascii_serialization() == self.api_origin.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_names_carry_version() {
        let mut config = Config::default();
        assert_eq!(config.shell_cache_name(), "waypost-shell-v1");
        assert_eq!(config.data_cache_name(), "waypost-data-v1");

        config.cache_version = 7;
        assert_eq!(config.shell_cache_name(), "waypost-shell-v7");
        assert_eq!(config.data_cache_name(), "waypost-data-v7");
    }

    #[test]
    fn test_shell_url_list_resolves_against_app_origin() {
        let config = Config::default();
        let urls = config.shell_url_list().unwrap();
        assert_eq!(urls.len(), config.shell_urls.len());
        assert_eq!(urls[0].as_str(), "https://waypost.app/");
        assert_eq!(urls[1].as_str(), "https://waypost.app/index.html");
    }

    #[test]
    fn test_is_api_origin() {
        let config = Config::default();
        let api = Url::parse("https://story-api.dicoding.dev/v1/stories?page=1").unwrap();
        let shell = Url::parse("https://waypost.app/app.css").unwrap();
        assert!(config.is_api_origin(&api));
        assert!(!config.is_api_origin(&shell));
    }
}
