//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Fetching items from the Hacker News API (`HnClient`)
//! - Walking and persisting the item tree (`Scraper`)

mod client;
mod scraper;

pub use client::{HnClient, ItemSource};
pub use scraper::{DEFAULT_WORKERS, Scraper};
