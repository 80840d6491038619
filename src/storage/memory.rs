// src/storage/memory.rs

//! In-memory key-value backend.
//!
//! Backs tests and store-less local runs. Matches the Redis backend's
//! observable behavior: glob key enumeration and per-entry TTL, with expiry
//! enforced at access time (no background eviction).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{KeyValue, glob_match};
use crate::error::Result;

struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Process-local key-value store.
#[derive(Default)]
pub struct MemoryBackend {
    data: DashMap<String, Entry>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValue for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // The read guard must be released before removing an expired entry,
        // or the removal deadlocks on the same shard.
        match self.data.get(key) {
            Some(entry) if !entry.expired() => return Ok(Some(entry.value.clone())),
            Some(_) => {}
            None => return Ok(None),
        }
        self.data.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.data.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        Ok(self
            .data
            .iter()
            .filter(|entry| !entry.value().expired() && glob_match(pattern, entry.key()))
            .map(|entry| entry.key().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let backend = MemoryBackend::new();
        backend.set("k", b"v", None).await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let backend = MemoryBackend::new();
        assert!(backend.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let backend = MemoryBackend::new();
        backend.set("k", b"v", None).await.unwrap();
        backend.delete("k").await.unwrap();
        backend.delete("k").await.unwrap();
        assert!(backend.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_hidden_from_get_and_keys() {
        let backend = MemoryBackend::new();
        backend
            .set("short", b"v", Some(Duration::from_millis(5)))
            .await
            .unwrap();
        backend.set("long", b"v", None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(backend.get("short").await.unwrap().is_none());
        assert_eq!(backend.keys("*").await.unwrap(), vec!["long".to_string()]);
    }

    #[tokio::test]
    async fn test_keys_glob_filtering() {
        let backend = MemoryBackend::new();
        backend.set("hn_item_story_1", b"a", None).await.unwrap();
        backend.set("hn_item_job_2", b"b", None).await.unwrap();
        backend.set("hn_top_stories", b"c", None).await.unwrap();

        let mut keys = backend.keys("hn_item_*").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["hn_item_job_2", "hn_item_story_1"]);
    }
}
