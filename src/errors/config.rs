//! Error types for cache configuration.

/// Invalid [`CacheConfig`](crate::CacheConfig) values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The refresh window must be longer than zero.
    #[error("Refresh window must be positive, got {minutes} minutes")]
    NonPositiveRefreshWindow {
        /// The configured window in whole minutes
        minutes: i64,
    },

    /// A bounded store must be able to hold at least one entry.
    #[error("max_entries must be at least 1")]
    ZeroMaxEntries,

    /// A zero TTL would expire every entry before it is read.
    #[error("TTL must be longer than zero")]
    ZeroTtl,
}
