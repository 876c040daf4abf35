//! Configuration for relative-range caching
//!
//! This module controls how far back the always-fresh refresh window reaches and
//! which eviction policy the in-memory entry store applies.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use relcache::CacheConfig;
//!
//! // 15 minute refresh window, no eviction
//! let config = CacheConfig::default();
//! assert!(config.max_entries.is_none());
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use relcache::CacheConfigBuilder;
//! use std::time::Duration;
//!
//! let config = CacheConfigBuilder::new()
//!     .refresh_window_minutes(5)
//!     .max_entries(256)
//!     .ttl(Duration::from_secs(3600))
//!     .build();
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use chrono::TimeDelta;

use crate::errors::ConfigError;

pub mod constants;

use constants::DEFAULT_REFRESH_WINDOW_MINUTES;

/// Configuration for a [`RelativeRangeCache`](crate::RelativeRangeCache)
///
/// Use [`CacheConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Trailing window that is never served from cache
    /// Default: 15 minutes
    pub refresh_window: TimeDelta,

    /// Maximum number of stored entries before least-recently-used eviction
    /// Default: None (unbounded, entries live as long as the cache)
    pub max_entries: Option<usize>,

    /// Time-to-live for stored entries, checked on access
    /// Default: None (entries never expire)
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl CacheConfig {
    /// Create the unbounded configuration
    ///
    /// Entries are kept for the lifetime of the cache instance. The store grows by one
    /// entry per distinct query set and raw `from` expression.
    pub fn unbounded() -> Self {
        Self {
            refresh_window: TimeDelta::minutes(DEFAULT_REFRESH_WINDOW_MINUTES),
            max_entries: None,
            ttl: None,
        }
    }

    /// Create a configuration that keeps at most `max_entries` entries
    ///
    /// # Example
    ///
    /// ```rust
    /// use relcache::CacheConfig;
    ///
    /// let config = CacheConfig::bounded(100);
    /// assert_eq!(config.max_entries, Some(100));
    /// ```
    pub fn bounded(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
            ..Self::unbounded()
        }
    }

    /// Check the configuration for values the cache cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_window <= TimeDelta::zero() {
            return Err(ConfigError::NonPositiveRefreshWindow {
                minutes: self.refresh_window.num_minutes(),
            });
        }
        if self.max_entries == Some(0) {
            return Err(ConfigError::ZeroMaxEntries);
        }
        if self.ttl == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTtl);
        }
        Ok(())
    }
}

/// Builder for [`CacheConfig`]
///
/// # Example
///
/// ```rust
/// use relcache::CacheConfigBuilder;
///
/// let config = CacheConfigBuilder::new()
///     .max_entries(10)
///     .build();
/// assert_eq!(config.max_entries, Some(10));
/// ```
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder starting from [`CacheConfig::unbounded`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the always-fresh refresh window
    pub fn refresh_window(mut self, window: TimeDelta) -> Self {
        self.config.refresh_window = window;
        self
    }

    /// Convenience: set the refresh window in whole minutes
    pub fn refresh_window_minutes(self, minutes: i64) -> Self {
        self.refresh_window(TimeDelta::minutes(minutes))
    }

    /// Enable least-recently-used eviction above `max` entries
    pub fn max_entries(mut self, max: usize) -> Self {
        self.config.max_entries = Some(max);
        self
    }

    /// Expire entries older than `ttl`
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.config.ttl = Some(ttl);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> CacheConfig {
        self.config
    }
}
