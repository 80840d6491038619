// src/services/scraper.rs

//! Recursive item scraper.
//!
//! Walks the top-stories tree: fetches the top list, persists it, then fans
//! the top-level IDs out to a bounded pool of workers. Each worker owns one
//! top-level branch end to end; recursion into kids and poll parts stays
//! sequential and depth-first inside the worker, so peak concurrency equals
//! the pool size regardless of tree shape.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};

use crate::error::{Result, ScrapeError};
use crate::services::ItemSource;
use crate::storage::ItemStore;

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 100;

/// Crawls the item tree from a source into the item store.
pub struct Scraper {
    source: Arc<dyn ItemSource>,
    store: ItemStore,
    workers: usize,
}

impl Scraper {
    /// Create a scraper with the default worker count.
    pub fn new(source: Arc<dyn ItemSource>, store: ItemStore) -> Self {
        Self::with_workers(source, store, DEFAULT_WORKERS)
    }

    /// Create a scraper with an explicit worker count. Zero is clamped to 1.
    pub fn with_workers(source: Arc<dyn ItemSource>, store: ItemStore, workers: usize) -> Self {
        Self {
            source,
            store,
            workers: workers.max(1),
        }
    }

    /// Run one full scrape.
    ///
    /// Returns the number of top-level IDs processed. The top list is always
    /// persisted before any item fetch begins; a failed top-list fetch or
    /// write aborts the run with no item work done. Branch failures never
    /// abort sibling branches; they are collected and returned as one
    /// aggregate error once every dispatched branch has completed.
    pub async fn run(&self) -> Result<usize> {
        let top = self.source.top_stories().await?;
        self.store.save_top_stories(&top).await?;

        log::info!(
            "Dispatching {} top-level items across {} workers",
            top.len(),
            self.workers
        );

        let mut failures = Vec::new();
        {
            let mut branches = stream::iter(top.iter().copied())
                .map(|id| async move { (id, self.visit(id).await) })
                .buffer_unordered(self.workers);

            // Single consumer: every dispatched ID yields exactly one
            // completion here, success or not.
            while let Some((id, result)) = branches.next().await {
                if let Err(error) = result {
                    log::warn!("Branch {} failed: {}", id, error);
                    failures.push((id, error));
                }
            }
        }

        if !failures.is_empty() {
            return Err(ScrapeError::new(failures).into());
        }

        Ok(top.len())
    }

    /// Visit one item: fetch, persist, then recurse into kids and parts.
    ///
    /// Tombstoned items count as visited but are neither persisted nor
    /// descended into. The first nested failure aborts the rest of this
    /// branch and propagates.
    fn visit(&self, id: u64) -> BoxFuture<'_, Result<()>> {
        async move {
            let item = self.source.item(id).await?;

            if item.is_tombstoned() {
                log::debug!("Skipping tombstoned item {}", id);
                return Ok(());
            }

            self.store.save_item(&item).await?;

            for nested in item.nested_ids() {
                self.visit(nested).await?;
            }

            Ok(())
        }
        .boxed()
    }
}
