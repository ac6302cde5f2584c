//! Shared Cache Module
//!
//! Process-wide, cloneable handle around the cache store for concurrent
//! request-handling tasks.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;

// == Shared Cache ==
/// Thread-safe handle to a [`CacheStore`], meant to be created once per
/// process and passed explicitly to every invocation context.
///
/// All mutating operations serialize behind a single store-wide lock, so
/// writes to unrelated keys block each other; the locked sections are short
/// bookkeeping only, and a `compute` future always runs with the lock
/// released, so a slow refresh never stalls the store for other callers.
///
/// No single-flight de-duplication: two callers racing on the same absent or
/// expired key may both run `compute`, and the later writer wins. Callers
/// needing at-most-one-compute semantics must layer a per-key in-flight
/// marker on top.
#[derive(Debug, Clone)]
pub struct SharedCache<V> {
    /// Store behind the process-wide lock
    store: Arc<RwLock<CacheStore<V>>>,
    /// TTL in seconds applied by [`fetch`](Self::fetch); `0` = never expires
    default_ttl: u64,
    /// Grace window in seconds applied by [`fetch`](Self::fetch)
    default_stale_grace: u64,
}

impl<V: Clone> SharedCache<V> {
    // == Constructors ==
    /// Creates a SharedCache with the built-in default TTL and grace window.
    pub fn new() -> Self {
        Self::from_config(&CacheConfig::default())
    }

    /// Creates a SharedCache with defaults taken from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new())),
            default_ttl: config.default_ttl,
            default_stale_grace: config.stale_grace,
        }
    }

    // == Read ==
    /// Retrieves the value for a key, if a live entry exists.
    ///
    /// See [`CacheStore::read`] for the `keep_expired` semantics.
    pub async fn read(&self, key: &str, keep_expired: bool) -> Result<Option<V>> {
        // Write lock: even a read updates stats and may evict.
        let mut store = self.store.write().await;
        store.read(key, keep_expired)
    }

    // == Remove ==
    /// Unconditionally deletes the entry for a key; no-op when absent.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let mut store = self.store.write().await;
        store.remove(key)
    }

    // == Get Or Compute ==
    /// Async form of [`CacheStore::get_or_compute`].
    ///
    /// The store is peeked and committed under the lock, but the `compute`
    /// future itself is awaited with no lock held. As a consequence the
    /// protocol is not atomic across callers: a value stored by a concurrent
    /// refresh between peek and commit is handled as documented on
    /// [`CacheStore::commit`].
    ///
    /// `compute` carries the same contract as in the synchronous store: it
    /// resolves to `Some(value)` or to `None` for "could not produce a
    /// value", and must not propagate errors past the cache boundary.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        compute: F,
        ttl_secs: u64,
        use_stale: bool,
        stale_grace_secs: u64,
    ) -> Result<Option<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<V>>,
    {
        {
            let mut store = self.store.write().await;
            if let Some(value) = store.read(key, true)? {
                return Ok(Some(value));
            }
        }

        // Lock released while the caller's refresh runs.
        let computed = compute().await;

        let mut store = self.store.write().await;
        store.commit(key, computed, ttl_secs, use_stale, stale_grace_secs)
    }

    // == Peek Or Compute ==
    /// Read-through lookup with stale fallback on; the async counterpart of
    /// [`CacheStore::peek_or_compute`].
    pub async fn peek_or_compute<F, Fut>(
        &self,
        key: &str,
        compute: F,
        ttl_secs: u64,
        stale_grace_secs: u64,
    ) -> Result<Option<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<V>>,
    {
        self.get_or_compute(key, compute, ttl_secs, true, stale_grace_secs)
            .await
    }

    // == Fetch ==
    /// Read-through lookup using the configured default TTL and grace window,
    /// the one-liner handed to hosted-function call sites.
    pub async fn fetch<F, Fut>(&self, key: &str, compute: F) -> Result<Option<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<V>>,
    {
        self.peek_or_compute(key, compute, self.default_ttl, self.default_stale_grace)
            .await
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        store.stats()
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        let store = self.store.read().await;
        store.len()
    }

    /// Returns true if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        let store = self.store.read().await;
        store.is_empty()
    }
}

impl<V: Clone> Default for SharedCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
