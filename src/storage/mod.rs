// src/storage/mod.rs

//! Key-value storage for scraped items.
//!
//! Every persisted item lives under a key that encodes its kind and ID
//! (`hn_item_{kind}_{id}`); the top list lives under one fixed key. That
//! encoding doubles as the read-side index: listing queries glob-scan the
//! keyspace and decode IDs back out of the matched keys, so the format is a
//! stable schema. [`ItemStore`] also carries the cache-aside accessor used
//! by the read API; cache keys share the store but use a disjoint namespace.

pub mod memory;
pub mod redis;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{Item, ItemKind};

// Re-export for convenience
pub use self::memory::MemoryBackend;
pub use self::redis::RedisBackend;

/// Fixed key holding the persisted top list.
pub const TOP_STORIES_KEY: &str = "hn_top_stories";

const ITEM_KEY_PREFIX: &str = "hn_item_";

/// Kinds that count as posts when no filter is given.
const POST_KINDS: [ItemKind; 3] = [ItemKind::Story, ItemKind::Job, ItemKind::Poll];

/// Kinds a listing scan will decode.
const ALL_KINDS: [ItemKind; 5] = [
    ItemKind::Story,
    ItemKind::Job,
    ItemKind::Poll,
    ItemKind::Comment,
    ItemKind::Pollopt,
];

/// Storage key for an item of the given kind and ID.
pub fn item_key(kind: ItemKind, id: u64) -> String {
    format!("{ITEM_KEY_PREFIX}{kind}_{id}")
}

/// Minimal key-value backend contract.
///
/// `keys` takes a redis-style glob pattern (`*` wildcard). Backends must
/// tolerate concurrent unordered writes to disjoint keys; no cross-key
/// transactions are required.
#[async_trait]
pub trait KeyValue: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;
}

/// Item record store and read-side index over a key-value backend.
#[derive(Clone)]
pub struct ItemStore {
    backend: Arc<dyn KeyValue>,
}

impl ItemStore {
    pub fn new(backend: Arc<dyn KeyValue>) -> Self {
        Self { backend }
    }

    /// Persist the top list verbatim, overwriting any previous run's list.
    pub async fn save_top_stories(&self, ids: &[u64]) -> Result<()> {
        let data = serde_json::to_vec(ids)?;
        self.backend.set(TOP_STORIES_KEY, &data, None).await
    }

    /// Persist one item under its composite key, overwriting unconditionally.
    /// The write is immediately visible to listing scans.
    pub async fn save_item(&self, item: &Item) -> Result<()> {
        let data = serde_json::to_vec(item)?;
        self.backend.set(&item_key(item.kind, item.id), &data, None).await
    }

    /// Remove an item's record. Administrative; the crawl path never deletes.
    pub async fn delete_item(&self, item: &Item) -> Result<()> {
        self.backend.delete(&item_key(item.kind, item.id)).await
    }

    /// IDs of every stored item, across all kinds.
    ///
    /// Order follows the backend's key enumeration and is not stable.
    pub async fn all_items(&self) -> Result<Vec<u64>> {
        self.scan_ids(&ALL_KINDS).await
    }

    /// IDs of stored posts: the given kind, or the union of story, job, and
    /// poll when no filter is given. Comments and poll options are never
    /// posts.
    pub async fn posts(&self, kind: Option<ItemKind>) -> Result<Vec<u64>> {
        match kind {
            Some(kind) => self.scan_ids(&[kind]).await,
            None => self.scan_ids(&POST_KINDS).await,
        }
    }

    /// Look up one item by ID, whatever its kind.
    ///
    /// When the same ID exists under several kinds the first matched key
    /// wins. An ID with no record is `Ok(None)`, not an error.
    pub async fn item(&self, id: u64) -> Result<Option<Item>> {
        let pattern = format!("{ITEM_KEY_PREFIX}*_{id}");
        let keys = self.backend.keys(&pattern).await?;

        let Some(key) = keys.first() else {
            return Ok(None);
        };

        match self.backend.get(key).await? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// Cache-aside accessor for expensive reads.
    ///
    /// A present entry that deserializes cleanly populates `target` without
    /// invoking `compute`. A miss, a backend read error, or a decode failure
    /// all fall through to `compute`; `target` is then populated from the
    /// freshly serialized value before the write-back is attempted, so a
    /// write-back failure still leaves `target` valid. That failure is
    /// surfaced as [`AppError::CacheWriteBack`].
    ///
    /// Concurrent misses on the same key each compute independently; last
    /// write wins.
    pub async fn cache<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        target: &mut T,
        compute: F,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Ok(Some(data)) = self.backend.get(key).await {
            if let Ok(value) = serde_json::from_slice(&data) {
                *target = value;
                return Ok(());
            }
            log::debug!("Discarding undecodable cache entry for {}", key);
        }

        let fresh = compute().await?;
        let encoded = serde_json::to_vec(&fresh)?;
        *target = serde_json::from_slice(&encoded)?;

        self.backend
            .set(key, &encoded, Some(ttl))
            .await
            .map_err(|e| AppError::cache_write_back(key, e))
    }

    /// Scan the item keyspace and decode IDs for the given kinds.
    ///
    /// Keys that do not match the decoding pattern (foreign keys, unknown
    /// kinds) are silently skipped rather than failing the listing.
    async fn scan_ids(&self, kinds: &[ItemKind]) -> Result<Vec<u64>> {
        let keys = self.backend.keys(&format!("{ITEM_KEY_PREFIX}*")).await?;

        let alternatives = kinds
            .iter()
            .map(ItemKind::as_str)
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!("^{ITEM_KEY_PREFIX}({alternatives})_([0-9]+)$"))
            .map_err(|e| AppError::validation(format!("bad kind pattern: {e}")))?;

        let mut ids = Vec::new();
        for key in keys {
            if let Some(captures) = pattern.captures(&key) {
                if let Ok(id) = captures[2].parse::<u64>() {
                    ids.push(id);
                }
            }
        }

        Ok(ids)
    }
}

/// Redis-style glob matching (`*` matches any run of characters, `?` any
/// single character). Shared by backends that enumerate keys themselves.
pub(crate) fn glob_match(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    // Iterative wildcard match with single-star backtracking.
    let (mut p, mut k) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while k < key.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == key[k]) {
            p += 1;
            k += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, k));
            p += 1;
        } else if let Some((sp, sk)) = star {
            p = sp + 1;
            k = sk + 1;
            star = Some((sp, sk + 1));
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }

    p == pattern.len()
}
