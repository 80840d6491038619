// src/services/client.rs

//! Hacker News API client.
//!
//! Thin read-only wrapper over the Firebase item API. The [`ItemSource`]
//! trait is the seam the scraper consumes, so tests can substitute a mock.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::Item;

/// A remote source of items.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Fetch the current list of top-level item IDs.
    async fn top_stories(&self) -> Result<Vec<u64>>;

    /// Fetch a single item by ID.
    async fn item(&self, id: u64) -> Result<Item>;
}

/// HTTP client for the Hacker News API.
pub struct HnClient {
    client: reqwest::Client,
    base_url: String,
}

impl HnClient {
    /// Create a client from API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| AppError::fetch(url, e))
    }
}

#[async_trait]
impl ItemSource for HnClient {
    async fn top_stories(&self) -> Result<Vec<u64>> {
        self.get_json("/topstories.json").await
    }

    async fn item(&self, id: u64) -> Result<Item> {
        // The API returns a JSON `null` body for IDs it has never issued;
        // surface that as a fetch error rather than a decode panic.
        let url_path = format!("/item/{id}.json");
        let maybe: Option<Item> = self.get_json(&url_path).await?;
        maybe.ok_or_else(|| AppError::fetch(self.url(&url_path), "item does not exist"))
    }
}
