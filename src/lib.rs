//! Grace Cache - an in-process key-value cache for function runtimes
//!
//! Provides per-entry TTL expiration, a compute-if-absent protocol, and a
//! stale-grace fallback that serves expired data when a refresh fails instead
//! of propagating the failure.
//!
//! The cache is an embeddable library: the host creates one
//! [`SharedCache`] at startup and hands it to every invocation context.
//! There is no persistence and no background eviction; expired entries are
//! reclaimed lazily on read.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, CacheStats, CacheStore, SharedCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
