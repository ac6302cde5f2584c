//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single cache entry: an opaque value plus its expiration metadata.
///
/// The expiration timestamp is fixed at the moment the entry is written or
/// extended; it is never recomputed relative to read time.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = never expires
    pub expires_at: Option<u64>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_secs` - TTL in seconds; `0` means the entry never expires
    pub fn new(value: V, ttl_secs: u64) -> Self {
        let now = current_timestamp_ms();
        let expires_at = if ttl_secs == 0 {
            None
        } else {
            Some(now + ttl_secs * 1000)
        };

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is considered expired when the current time
    /// is greater than or equal to the expiration time, so the instant the TTL
    /// has fully elapsed the entry is expired.
    ///
    /// # Returns
    /// - `true` if the entry has an expiry and the current time >= expiration time
    /// - `false` if the entry never expires or its TTL hasn't elapsed
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Extend ==
    /// Moves the expiration forward to `now + grace_secs`, leaving the stored
    /// value untouched.
    ///
    /// This is the stale-grace extension: an expired entry whose refresh failed
    /// gets a bounded second life instead of being evicted.
    pub fn extend(&mut self, grace_secs: u64) {
        self.expires_at = Some(current_timestamp_ms() + grace_secs * 1000);
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired (TTL elapsed)
    /// - `Some(remaining_ms)` if the entry has an expiry and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_ms();
            if expires > now {
                expires - now
            } else {
                0
            }
        })
    }

    /// Returns remaining TTL in seconds, or None if the entry never expires.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.ttl_remaining_ms().map(|ms| ms / 1000)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
