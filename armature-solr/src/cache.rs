//! Response cache collaborator.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Store for raw response bodies, keyed by [`SolrQuery::cache_key`](crate::SolrQuery::cache_key).
///
/// The client treats every error from a store as a miss.
#[async_trait]
pub trait QueryCache: Send + Sync {
    /// Get a cached body.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a body for `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

/// In-memory cache with per-entry expiry.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    data: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

#[derive(Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl InMemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Drop expired entries.
    pub async fn cleanup_expired(&self) {
        let now = Instant::now();
        self.data.write().await.retain(|_, entry| entry.expires_at > now);
    }
}

#[async_trait]
impl QueryCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self.data.read().await;
        Ok(data
            .get(key)
            .filter(|entry| Instant::now() <= entry.expires_at)
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.data.write().await.insert(key.to_string(), entry);
        Ok(())
    }
}
