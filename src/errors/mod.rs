//! Error types for the relcache library.
//!
//! This module follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`CacheWriteError`],
//!   [`TrimError`], [`TimeRangeError`], [`ConfigError`])
//! - **Unified error type** ([`RelCacheError`]) for convenience when you don't need
//!   to distinguish between error sources
//!
//! Cache misses, non-cacheable ranges and stale entries are *not* errors. They are
//! reported as `None` from [`RelativeRangeCache::get`](crate::RelativeRangeCache::get)
//! or as [`WriteOutcome::NotCacheable`](crate::WriteOutcome::NotCacheable) and always
//! mean "perform a full, uncached fetch".
//!
//! # Examples
//!
//! ```rust
//! use relcache::{RelCacheError, TimeRange};
//! use chrono::Utc;
//!
//! fn example() -> Result<(), RelCacheError> {
//!     let range = TimeRange::relative("now-6h", "now", Utc::now())?;
//!     assert!(range.from < range.to);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

mod config;
mod time_range;
mod trim;
mod write;

pub use config::ConfigError;
pub use time_range::TimeRangeError;
pub use trim::TrimError;
pub use write::CacheWriteError;

/// Unified error type for all relcache operations.
///
/// All module-specific error types convert to `RelCacheError` via `From`
/// implementations, so `?` propagates them naturally.
#[derive(Debug, thiserror::Error)]
pub enum RelCacheError {
    /// A response could not be written to the cache.
    #[error("Cache write error: {0}")]
    Write(#[from] CacheWriteError),

    /// A cached frame could not be trimmed.
    #[error("Trim error: {0}")]
    Trim(#[from] TrimError),

    /// A time range could not be resolved.
    #[error("Time range error: {0}")]
    TimeRange(#[from] TimeRangeError),

    /// The cache configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
