//! In-memory response cache keyed by method, serving origin and URI

use axum::body::Bytes;
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::types::CacheStats;

/// A fully buffered response
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Responses are immutable until their TTL expires; there is no invalidation.
pub struct ResponseCache {
    entries: Cache<String, Arc<CachedResponse>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub fn new(ttl_secs: u64, capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache key for a request
    ///
    /// Relayed profiles embed the serving origin, so requests answered for
    /// different origins never share an entry.
    pub fn key(method: &Method, origin: &str, uri: &Uri) -> String {
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        format!("{} {}{}", method, origin, path_and_query)
    }

    pub async fn get(&self, key: &str) -> Option<Arc<CachedResponse>> {
        let cached = self.entries.get(key).await;
        if cached.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key, "Response cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        cached
    }

    pub async fn insert(&self, key: String, response: CachedResponse) {
        self.entries.insert(key, Arc::new(response)).await;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
