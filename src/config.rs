//! Configuration Module
//!
//! Handles loading cache defaults from environment variables.

use std::env;

/// Default TTL and grace-window parameters for a process-wide cache.
///
/// All values can be configured via environment variables with sensible
/// defaults. There is no configuration-file parsing; the embedding host owns
/// that concern.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Default TTL in seconds applied by read-through lookups; `0` means
    /// entries never expire
    pub default_ttl: u64,
    /// Default grace window in seconds for serving stale values after a
    /// failed refresh
    pub stale_grace: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300, 0 = never)
    /// - `CACHE_STALE_GRACE` - Stale grace window in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            default_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            stale_grace: env::var("CACHE_STALE_GRACE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: 300,
            stale_grace: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.stale_grace, 30);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_DEFAULT_TTL");
        env::remove_var("CACHE_STALE_GRACE");

        let config = CacheConfig::from_env();
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.stale_grace, 30);
    }
}
