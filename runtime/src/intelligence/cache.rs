// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Short-lived memoization of extraction results.
//!
//! ## Keys
//!
//! [`CacheKey::render`] is a pure function of the call arguments, so two
//! calls with the same profile, media type and count always share an entry.
//!
//! ## Expiry and eviction
//!
//! Entries expire lazily: a read past the TTL is a miss and drops the entry.
//! When the backend is full, expired entries are evicted first, otherwise the
//! least-recently-accessed one.

use crate::extraction::types::{LinkCollection, MediaType};
use anyhow::{Context, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Default bound on cached results before eviction.
const DEFAULT_MAX_ENTRIES: usize = 512;

/// What a cached value was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Media URLs of a profile.
    Profile {
        username: String,
        media_type: MediaType,
        max_count: usize,
    },
    /// Post permalinks of a profile grid.
    Posts { username: String, max_count: usize },
    /// Media of a single post.
    Post { permalink: Url, media_type: MediaType },
}

impl CacheKey {
    pub fn render(&self) -> String {
        match self {
            CacheKey::Profile {
                username,
                media_type,
                max_count,
            } => format!("profile:{username}:{media_type}:{max_count}"),
            CacheKey::Posts {
                username,
                max_count,
            } => format!("posts:{username}:{max_count}"),
            CacheKey::Post {
                permalink,
                media_type,
            } => format!("post:{permalink}:{media_type}"),
        }
    }
}

/// String-keyed storage with per-entry TTL.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

struct Entry {
    value: String,
    expires_at: Instant,
    last_accessed: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process backend shared by concurrent requests.
pub struct MemoryBackend {
    entries: DashMap<String, Entry>,
    max_entries: usize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryBackend {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict(&self, now: Instant) {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().is_expired(now))
            .map(|e| e.key().clone())
            .collect();
        if !expired.is_empty() {
            for key in expired {
                self.entries.remove(&key);
            }
            return;
        }

        let lru = self
            .entries
            .iter()
            .min_by_key(|e| e.value().last_accessed)
            .map(|e| e.key().clone());
        if let Some(key) = lru {
            info!("evicting LRU cache entry: {key}");
            self.entries.remove(&key);
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        match self.entries.get_mut(key) {
            None => return Ok(None),
            Some(mut entry) => {
                if !entry.is_expired(now) {
                    entry.last_accessed = now;
                    return Ok(Some(entry.value.clone()));
                }
            }
        }
        self.entries.remove_if(key, |_, e| e.is_expired(now));
        debug!(key, "dropped expired cache entry");
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(key) {
            self.evict(now);
        }
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now + ttl,
                last_accessed: now,
            },
        );
        Ok(())
    }
}

/// Typed cache of [`LinkCollection`]s over any [`CacheBackend`].
///
/// Backend failures are logged and behave as misses (on read) or skipped
/// writes; the cache never fails an extraction.
#[derive(Clone)]
pub struct MediaCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl MediaCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Cache over a fresh [`MemoryBackend`].
    pub fn in_memory(ttl: Duration, max_entries: usize) -> Self {
        Self::new(Arc::new(MemoryBackend::new(max_entries)), ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, key: &CacheKey) -> Option<LinkCollection> {
        let rendered = key.render();
        let raw = match self.backend.get(&rendered).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("cache read failed for {rendered}: {e:#}");
                return None;
            }
        };
        match serde_json::from_str(&raw).with_context(|| format!("decoding cached {rendered}")) {
            Ok(links) => {
                debug!(key = %rendered, "cache hit");
                Some(links)
            }
            Err(e) => {
                warn!("{e:#}");
                None
            }
        }
    }

    pub async fn set(&self, key: &CacheKey, links: &LinkCollection) {
        let rendered = key.render();
        let stored = match serde_json::to_string(links) {
            Ok(raw) => self.backend.set(&rendered, raw, self.ttl).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = stored {
            warn!("cache write failed for {rendered}: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(raw: &[&str]) -> LinkCollection {
        LinkCollection::try_from(raw.iter().map(|s| s.to_string()).collect::<Vec<_>>()).unwrap()
    }

    fn profile_key(max_count: usize) -> CacheKey {
        CacheKey::Profile {
            username: "realuser".into(),
            media_type: MediaType::Photo,
            max_count,
        }
    }

    #[test]
    fn test_keys_are_deterministic_and_distinct() {
        assert_eq!(profile_key(3).render(), "profile:realuser:photo:3");
        assert_eq!(profile_key(3).render(), profile_key(3).render());
        assert_ne!(profile_key(3).render(), profile_key(4).render());

        let post = CacheKey::Post {
            permalink: Url::parse("https://site.test/p/abc/").unwrap(),
            media_type: MediaType::Clip,
        };
        assert_eq!(post.render(), "post:https://site.test/p/abc/:clip");
        let posts = CacheKey::Posts {
            username: "realuser".into(),
            max_count: 3,
        };
        assert_eq!(posts.render(), "posts:realuser:3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_miss_after() {
        let cache = MediaCache::in_memory(Duration::from_secs(15), 8);
        let value = links(&["https://cdn.test/a.jpg"]);

        cache.set(&profile_key(3), &value).await;
        assert_eq!(cache.get(&profile_key(3)).await, Some(value));

        tokio::time::advance(Duration::from_secs(16)).await;
        assert_eq!(cache.get(&profile_key(3)).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_overwrites() {
        let cache = MediaCache::in_memory(Duration::from_secs(15), 8);
        cache.set(&profile_key(1), &links(&["https://cdn.test/a.jpg"])).await;
        cache.set(&profile_key(1), &links(&["https://cdn.test/b.jpg"])).await;

        let got = cache.get(&profile_key(1)).await.unwrap();
        assert_eq!(got.to_strings(), vec!["https://cdn.test/b.jpg"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_dropped_on_read() {
        let backend = MemoryBackend::new(8);
        backend.set("k", "v".into(), Duration::from_secs(1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(backend.get("k").await.unwrap(), None);
        assert!(backend.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lru_eviction() {
        let backend = MemoryBackend::new(3);
        let ttl = Duration::from_secs(60);
        backend.set("a", "1".into(), ttl).await.unwrap();
        tokio::time::advance(Duration::from_millis(10)).await;
        backend.set("b", "2".into(), ttl).await.unwrap();
        tokio::time::advance(Duration::from_millis(10)).await;
        backend.set("c", "3".into(), ttl).await.unwrap();
        tokio::time::advance(Duration::from_millis(10)).await;

        // Touch a so b becomes least recently used.
        backend.get("a").await.unwrap();
        tokio::time::advance(Duration::from_millis(10)).await;
        backend.set("d", "4".into(), ttl).await.unwrap();

        assert_eq!(backend.len(), 3);
        assert!(backend.get("b").await.unwrap().is_none());
        assert!(backend.get("a").await.unwrap().is_some());
        assert!(backend.get("d").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_evicted_before_lru() {
        let backend = MemoryBackend::new(2);
        backend.set("short", "1".into(), Duration::from_secs(1)).await.unwrap();
        backend.set("long", "2".into(), Duration::from_secs(60)).await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        backend.set("new", "3".into(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(backend.len(), 2);
        assert!(backend.get("long").await.unwrap().is_some());
        assert!(backend.get("new").await.unwrap().is_some());
    }

    struct BrokenBackend;

    #[async_trait]
    impl CacheBackend for BrokenBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            anyhow::bail!("backend offline")
        }
        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<()> {
            anyhow::bail!("backend offline")
        }
    }

    #[tokio::test]
    async fn test_backend_failure_is_a_miss() {
        let cache = MediaCache::new(Arc::new(BrokenBackend), Duration::from_secs(15));
        cache.set(&profile_key(3), &links(&["https://cdn.test/a.jpg"])).await;
        assert!(cache.get(&profile_key(3)).await.is_none());
    }
}
