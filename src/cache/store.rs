//! Cache Store Module
//!
//! Main cache engine: a key-value map with lazy TTL expiration, a
//! compute-if-absent protocol, and stale-grace fallback when a refresh fails.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, MAX_KEY_LENGTH};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// In-process cache mapping string keys to opaque values with per-entry TTL.
///
/// Values are generic; the store only requires `Clone` so reads can hand out
/// an owned copy. Expired entries are reclaimed lazily, on the first
/// non-suppressed read that observes them past expiry. There is no background
/// sweeper, so an expired key that is never read again stays in memory until
/// it is overwritten, removed, or the process exits.
///
/// The store itself is single-threaded (`&mut self` operations); shared
/// concurrent access goes through [`SharedCache`](crate::SharedCache).
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new, empty CacheStore.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    // == Read ==
    /// Retrieves the value for a key, if a live entry exists.
    ///
    /// An entry is live when it never expires or its expiry lies in the
    /// future. An expired entry is evicted before returning `None`, unless
    /// `keep_expired` is set, in which case it stays in place (still expired)
    /// so a later stale-fallback call can resurrect it.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    /// * `keep_expired` - Suppress eviction of an expired entry
    pub fn read(&mut self, key: &str, keep_expired: bool) -> Result<Option<V>> {
        validate_key(key)?;

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Ok(Some(value))
            }
            Some(_) => {
                if !keep_expired {
                    self.entries.remove(key);
                    self.stats.record_eviction();
                    self.stats.set_total_entries(self.entries.len());
                    debug!("Evicted expired entry for key '{}'", key);
                }
                self.stats.record_miss();
                Ok(None)
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Remove ==
    /// Unconditionally deletes the entry for a key.
    ///
    /// Returns `true` if an entry was removed, `false` if the key was absent
    /// (a no-op, not an error).
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;

        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.set_total_entries(self.entries.len());
            debug!("Removed entry for key '{}'", key);
        }
        Ok(removed)
    }

    // == Get Or Compute ==
    /// Returns the live value for a key, computing and storing a fresh one if
    /// there is none.
    ///
    /// Protocol, in order:
    /// 1. Non-evicting read; a live entry is returned immediately and
    ///    `compute` is never invoked.
    /// 2. `compute()` runs. `Some(v)` means a usable value (any payload the
    ///    caller considers valid, including an empty one); `None` means the
    ///    refresh failed to produce a value.
    /// 3. On `Some(v)`: the value is stored with `expires_at = now + ttl`
    ///    (never expiring when `ttl_secs` is 0), overwriting any prior entry,
    ///    and returned.
    /// 4. On `None` with `use_stale` unset: nothing is stored and `None` is
    ///    returned.
    /// 5. On `None` with `use_stale` set: a prior expired entry, if present,
    ///    has its expiry extended to `now + stale_grace_secs` with its value
    ///    untouched, and that preserved value is returned. With no prior
    ///    entry there is nothing to fall back to and `None` is returned.
    ///
    /// Contract on `compute`: it must not panic or propagate errors past the
    /// cache boundary. Callers catch their own failures and translate them to
    /// `None` before handing the closure to the cache. What counts as "could
    /// not produce a value" is a per-call-site decision.
    ///
    /// # Arguments
    /// * `key` - The key to look up or populate
    /// * `compute` - Fallible producer of a fresh value
    /// * `ttl_secs` - TTL for a freshly stored value; `0` = never expires
    /// * `use_stale` - Serve a prior expired value when `compute` fails
    /// * `stale_grace_secs` - How long a served stale value stays live
    pub fn get_or_compute<F>(
        &mut self,
        key: &str,
        compute: F,
        ttl_secs: u64,
        use_stale: bool,
        stale_grace_secs: u64,
    ) -> Result<Option<V>>
    where
        F: FnOnce() -> Option<V>,
    {
        if let Some(value) = self.read(key, true)? {
            return Ok(Some(value));
        }

        let computed = compute();
        self.commit(key, computed, ttl_secs, use_stale, stale_grace_secs)
    }

    // == Commit ==
    /// Applies the outcome of a compute to the store (steps 3-5 of the
    /// [`get_or_compute`](Self::get_or_compute) protocol).
    ///
    /// Split out so callers holding the store behind a lock can run the
    /// computation with the lock released: peek, unlock, compute, re-lock,
    /// commit. Between peek and commit another caller may have stored a live
    /// entry for the same key; on a successful compute the later write wins,
    /// and on a failed compute with `use_stale` set a live entry is returned
    /// as-is rather than having its fresh expiry shortened to the grace
    /// window.
    pub fn commit(
        &mut self,
        key: &str,
        computed: Option<V>,
        ttl_secs: u64,
        use_stale: bool,
        stale_grace_secs: u64,
    ) -> Result<Option<V>> {
        validate_key(key)?;

        match computed {
            Some(value) => {
                self.entries
                    .insert(key.to_string(), CacheEntry::new(value.clone(), ttl_secs));
                self.stats.record_refresh();
                self.stats.set_total_entries(self.entries.len());
                debug!("Stored computed value for key '{}' (ttl={}s)", key, ttl_secs);
                Ok(Some(value))
            }
            None if use_stale => match self.entries.get_mut(key) {
                Some(entry) => {
                    if entry.is_expired() {
                        entry.extend(stale_grace_secs);
                        self.stats.record_stale_serve();
                        warn!(
                            "Compute failed for key '{}', serving stale value for another {}s",
                            key, stale_grace_secs
                        );
                    } else {
                        // A concurrent refresh landed between peek and commit.
                        self.stats.record_hit();
                    }
                    Ok(Some(entry.value.clone()))
                }
                None => {
                    debug!("Compute failed for key '{}' and no stale entry to fall back to", key);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    // == Peek Or Compute ==
    /// Read-through lookup with stale fallback on, the surface handed to
    /// top-level callers: a live value is returned as-is, otherwise the value
    /// is recomputed and a failed recompute falls back to a prior expired
    /// value within the grace window.
    ///
    /// Equivalent to [`get_or_compute`](Self::get_or_compute) with
    /// `use_stale = true`; the protocol's opening step already performs the
    /// same non-evicting read.
    pub fn peek_or_compute<F>(
        &mut self,
        key: &str,
        compute: F,
        ttl_secs: u64,
        stale_grace_secs: u64,
    ) -> Result<Option<V>>
    where
        F: FnOnce() -> Option<V>,
    {
        self.get_or_compute(key, compute, ttl_secs, true, stale_grace_secs)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Test Hooks ==
    /// Backdates the expiry of an entry so tests can advance the clock
    /// without sleeping.
    #[cfg(test)]
    pub(crate) fn force_expire(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            if entry.expires_at.is_some() {
                entry.expires_at =
                    Some(crate::cache::entry::current_timestamp_ms().saturating_sub(1));
            }
        }
    }

    /// Returns whether an entry (live or expired) is present.
    #[cfg(test)]
    pub(crate) fn contains_entry(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Key Validation ==
/// Fails fast on programmer misuse: empty keys and keys past the sanity bound.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::EmptyKey);
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::KeyTooLong(key.len()));
    }
    Ok(())
}
