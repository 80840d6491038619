// src/error.rs

//! Unified error handling for the crawler application.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Store backend error
    #[error("store error: {0}")]
    Store(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote API returned a non-success status
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("validation error: {0}")]
    Validation(String),

    /// Item fetch failed with surrounding context
    #[error("fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// One or more crawl branches failed
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// The cached result was computed but could not be written back.
    ///
    /// The caller's target is already populated when this is returned;
    /// treat it as "result valid, caching failed".
    #[error("cache write-back failed for {key}: {source}")]
    CacheWriteBack {
        key: String,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error with URL context.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Wrap a store error as a cache write-back failure for `key`.
    pub fn cache_write_back(key: impl Into<String>, source: AppError) -> Self {
        Self::CacheWriteBack {
            key: key.into(),
            source: Box::new(source),
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        Self::Store(err.to_string())
    }
}

/// Aggregate error for a scrape run.
///
/// Collects every failed top-level branch; siblings of a failed branch are
/// never aborted, so the list is complete when the run finishes.
#[derive(Debug)]
pub struct ScrapeError {
    failures: Vec<(u64, AppError)>,
}

impl ScrapeError {
    pub fn new(failures: Vec<(u64, AppError)>) -> Self {
        Self { failures }
    }

    /// The failed top-level IDs with their branch errors.
    pub fn failures(&self) -> &[(u64, AppError)] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scrape failed for {} branch(es): ", self.failures.len())?;
        for (i, (id, err)) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "item {id}: {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ScrapeError {}
