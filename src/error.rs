//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Only programmer misuse surfaces as an error. A compute that could not
//! produce a value is not an error to the cache: it is the `None` arm of the
//! compute result and is handled by the stale-fallback protocol. A requested
//! stale fallback with no prior entry likewise surfaces as an ordinary
//! "no value" result.

use thiserror::Error;

use crate::cache::MAX_KEY_LENGTH;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Empty key supplied to an operation
    #[error("Key cannot be empty")]
    EmptyKey,

    /// Key exceeds the sanity bound
    #[error("Key of {0} bytes exceeds maximum length of {MAX_KEY_LENGTH} bytes")]
    KeyTooLong(usize),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
