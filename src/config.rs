// src/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Scrape run settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Key-value store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Read API server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::validation("api.base_url is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.scraper.workers == 0 {
            return Err(AppError::validation("scraper.workers must be > 0"));
        }
        if self.store.url.trim().is_empty() {
            return Err(AppError::validation("store.url is empty"));
        }
        if self.server.bind.trim().is_empty() {
            return Err(AppError::validation("server.bind is empty"));
        }
        if self.server.cache_ttl_secs == 0 {
            return Err(AppError::validation("server.cache_ttl_secs must be > 0"));
        }
        Ok(())
    }
}

/// Remote Hacker News API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the item API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Scrape run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Worker pool size; bounds concurrent top-level branches
    #[serde(default = "defaults::workers")]
    pub workers: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            workers: defaults::workers(),
        }
    }
}

/// Key-value store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Redis connection URL
    #[serde(default = "defaults::store_url")]
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: defaults::store_url(),
        }
    }
}

/// Read API server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the read API
    #[serde(default = "defaults::bind")]
    pub bind: String,

    /// TTL for cached aggregate queries, in seconds
    #[serde(default = "defaults::cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
            cache_ttl_secs: defaults::cache_ttl(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://hacker-news.firebaseio.com/v0".to_string()
    }

    pub fn timeout() -> u64 {
        10
    }

    pub fn user_agent() -> String {
        concat!("hn-crawler/", env!("CARGO_PKG_VERSION")).to_string()
    }

    pub fn workers() -> usize {
        100
    }

    pub fn store_url() -> String {
        "redis://127.0.0.1:6379".to_string()
    }

    pub fn bind() -> String {
        "127.0.0.1:8901".to_string()
    }

    pub fn cache_ttl() -> u64 {
        300
    }
}
