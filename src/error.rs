//! Error types for the tiercache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: a cache could not be constructed (zero capacity,
//!   out-of-range eviction factor, unknown policy selector, base directory
//!   that cannot be created).
//! - [`CacheError`]: Runtime failures of cache operations. Only the durable
//!   tier performs I/O, so in-memory caches only ever surface
//!   [`CacheError::NotFound`] from frequency queries.
//!
//! Negative lookups are not errors: `get`/`remove` on a missing key return
//! `Ok(None)` and `contains_key` returns `false`.
//!
//! ## Example Usage
//!
//! ```
//! use tiercache::error::ConfigError;
//! use tiercache::policy::lfu::LfuCache;
//!
//! let cache: Result<LfuCache<String, i32>, ConfigError> = LfuCache::try_new(10, 0.5);
//! assert!(cache.is_ok());
//!
//! // Eviction factor must lie in (0, 1]
//! let bad = LfuCache::<String, i32>::try_new(10, 1.5);
//! assert!(bad.is_err());
//! ```

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A cache parameter failed validation; no cache is produced.
///
/// Returned by fallible constructors such as
/// [`LfuCache::try_new`](crate::policy::lfu::LfuCache::try_new) and the
/// builders' `build()` methods.
///
/// # Example
///
/// ```
/// use tiercache::policy::lfu::LfuCache;
///
/// let err = LfuCache::<u64, u64>::try_new(0, 0.5).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Wraps a human-readable description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The description passed to [`new`](Self::new).
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Construction-time validation failure.
    #[error("invalid cache configuration: {0}")]
    Config(#[from] ConfigError),

    /// Frequency query for a key that is not tracked.
    #[error("key {key} not found in the cache")]
    NotFound { key: String },

    /// Blob file could not be written, read or deleted.
    #[error("blob I/O failed at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Blob contents could not be encoded or decoded.
    #[error("blob codec failed at '{}': {source}", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
}

impl CacheError {
    /// Builds a [`CacheError::NotFound`] rendering the key with `Debug`.
    pub fn not_found<K: std::fmt::Debug>(key: &K) -> Self {
        CacheError::NotFound {
            key: format!("{key:?}"),
        }
    }

    /// Returns `true` for [`CacheError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
